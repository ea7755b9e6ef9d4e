use crate::catalog;
use crate::types::MetricModel;
use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `MIXSIM__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub overrides: OverridesConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_segments")]
    pub segments: Vec<String>,
    #[serde(default = "default_messages")]
    pub messages: Vec<String>,
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    #[serde(default = "default_total_budget")]
    pub total_budget: f64,
    /// `cpm` or `cost_per_click`.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_cpc_ctr")]
    pub cpc_ctr: f64,
    #[serde(default = "default_cost_per_click")]
    pub cost_per_click: f64,
    #[serde(default = "default_cpc_conversion_rate")]
    pub cpc_conversion_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverridesConfig {
    #[serde(default)]
    pub lift_csv: Option<String>,
    #[serde(default)]
    pub benchmark_csv: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Write the CSV export after every run.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_export_path")]
    pub path: String,
}

// Default functions
fn default_segments() -> Vec<String> {
    catalog::segments()
}
fn default_messages() -> Vec<String> {
    catalog::messages()
}
fn default_channels() -> Vec<String> {
    catalog::channels()
}
fn default_total_budget() -> f64 {
    catalog::DEFAULT_TOTAL_BUDGET
}
fn default_model() -> String {
    "cpm".to_string()
}
fn default_cpc_ctr() -> f64 {
    MetricModel::COST_PER_CLICK_CTR
}
fn default_cost_per_click() -> f64 {
    MetricModel::COST_PER_CLICK_PRICE
}
fn default_cpc_conversion_rate() -> f64 {
    MetricModel::COST_PER_CLICK_CONVERSION_RATE
}
fn default_export_path() -> String {
    "looker_simulation_export.csv".to_string()
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            messages: default_messages(),
            channels: default_channels(),
            total_budget: default_total_budget(),
            model: default_model(),
            cpc_ctr: default_cpc_ctr(),
            cost_per_click: default_cost_per_click(),
            cpc_conversion_rate: default_cpc_conversion_rate(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_export_path(),
        }
    }
}

#[allow(clippy::derivable_impls)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            overrides: OverridesConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Resolve the configured model name into a [`MetricModel`].
    pub fn metric_model(&self) -> Result<MetricModel, crate::MixSimError> {
        match self.model.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cpm" => Ok(MetricModel::Cpm),
            "cost_per_click" | "cpc" => Ok(MetricModel::CostPerClick {
                ctr: self.cpc_ctr,
                cost_per_click: self.cost_per_click,
                conversion_rate: self.cpc_conversion_rate,
            }),
            other => Err(crate::MixSimError::Config(format!(
                "unknown metric model '{other}'"
            ))),
        }
    }
}

impl ExportConfig {
    /// Where to write the CSV export, if anywhere. An explicit `output` wins;
    /// otherwise the configured path is used when export is enabled.
    pub fn target(&self, output: Option<&str>) -> Option<String> {
        match output {
            Some(path) => Some(path.to_string()),
            None if self.enabled => Some(self.path.clone()),
            None => None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MIXSIM")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("simulation.segments")
                .with_list_parse_key("simulation.messages")
                .with_list_parse_key("simulation.channels"),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
