pub mod catalog;
pub mod config;
pub mod error;
pub mod overrides;
pub mod types;

pub use config::AppConfig;
pub use error::{MixSimError, MixSimResult};
pub use types::{
    BenchmarkEntry, BenchmarkTable, BudgetSplit, CampaignResult, ChannelSummary, LiftEntry,
    LiftTable, MetricModel, SimulationInput,
};
