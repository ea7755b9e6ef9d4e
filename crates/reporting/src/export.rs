//! Result export — the Looker Studio CSV and a JSON run report.

use chrono::{DateTime, Utc};
use mixsim_core::{CampaignResult, ChannelSummary, MixSimError, MixSimResult, SimulationInput};
use serde::Serialize;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

pub const EXPORT_FILE_NAME: &str = "looker_simulation_export.csv";
pub const EXPORT_MIME: &str = "text/csv";

pub const CSV_HEADER: [&str; 9] = [
    "Segment",
    "Message",
    "Channel",
    "Channel Budget ($)",
    "Impressions",
    "Clicks",
    "Conversions",
    "CPA ($)",
    "ROI (x)",
];

/// Encode rows as UTF-8 CSV in emission order.
///
/// Channel budget is written as whole dollars. CPA and ROI are written with
/// two decimals; NaN becomes an empty cell.
pub fn to_csv(results: &[CampaignResult]) -> MixSimResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for row in results {
        wtr.write_record([
            row.segment.clone(),
            row.message.clone(),
            row.channel.clone(),
            whole_dollars(row.channel_budget),
            row.impressions.to_string(),
            row.clicks.to_string(),
            row.conversions.to_string(),
            decimal_cell(row.cpa),
            decimal_cell(row.roi),
        ])?;
    }

    wtr.into_inner().map_err(|e| MixSimError::Io(e.into_error()))
}

/// Write the CSV export to `path`.
pub fn write_csv(results: &[CampaignResult], path: impl AsRef<Path>) -> MixSimResult<()> {
    let path = path.as_ref();
    let bytes = to_csv(results)?;
    std::fs::write(path, &bytes)?;
    info!(
        path = %path.display(),
        rows = results.len(),
        bytes = bytes.len(),
        mime = EXPORT_MIME,
        "Wrote simulation export"
    );
    Ok(())
}

/// A full run: inputs echoed back alongside rows and channel rollups.
///
/// Write-only: NaN metrics serialize as `null`, which does not read back into `f64`.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub model: String,
    pub total_budget: f64,
    pub segments: Vec<String>,
    pub messages: Vec<String>,
    pub channels: Vec<String>,
    pub results: Vec<CampaignResult>,
    pub summary: Vec<ChannelSummary>,
    pub generated_at: DateTime<Utc>,
}

impl SimulationReport {
    pub fn new(
        input: &SimulationInput,
        results: Vec<CampaignResult>,
        summary: Vec<ChannelSummary>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            model: input.model.name().to_string(),
            total_budget: input.total_budget,
            segments: input.segments.clone(),
            messages: input.messages.clone(),
            channels: input.channels.clone(),
            results,
            summary,
            generated_at: Utc::now(),
        }
    }

    /// Pretty JSON; NaN metrics serialize as `null`.
    pub fn to_json(&self) -> MixSimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn whole_dollars(value: f64) -> String {
    if value.is_finite() {
        format!("{}", value.trunc() as i64)
    } else {
        String::new()
    }
}

fn decimal_cell(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        String::new()
    }
}
