use thiserror::Error;

pub type MixSimResult<T> = Result<T, MixSimError>;

#[derive(Error, Debug)]
pub enum MixSimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing column '{column}' in {table} upload")]
    MissingColumn { table: &'static str, column: &'static str },

    #[error("Invalid value for '{column}' at row {row}: {value:?}")]
    InvalidValue {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("Invalid override '{0}'")]
    InvalidOverride(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for MixSimError {
    fn from(err: config::ConfigError) -> Self {
        MixSimError::Config(err.to_string())
    }
}
