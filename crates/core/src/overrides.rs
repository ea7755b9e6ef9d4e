//! Planner-supplied overrides for the lift and benchmark tables.
//!
//! Uploaded CSVs are validated in full before anything is returned, so a bad
//! file never reaches the engine half-applied. Inline overrides use the
//! compact `Channel=CPM:CTR:CVR` and `Segment/Message=Lift` forms.

use crate::error::{MixSimError, MixSimResult};
use crate::types::{BenchmarkEntry, BenchmarkTable, LiftEntry, LiftTable};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const LIFT_TABLE: &str = "lift";
const BENCHMARK_TABLE: &str = "benchmark";

/// Parse a persona upload with columns `Segment, Message, Channel, Lift`.
///
/// The `Channel` column is optional; lift is keyed on segment and message only.
pub fn parse_lift_csv<R: Read>(reader: R) -> MixSimResult<LiftTable> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let segment_idx = require_column(&headers, LIFT_TABLE, "Segment")?;
    let message_idx = require_column(&headers, LIFT_TABLE, "Message")?;
    let lift_idx = require_column(&headers, LIFT_TABLE, "Lift")?;

    let mut table = LiftTable::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let segment = text_field(&record, segment_idx, "Segment", row)?;
        let message = text_field(&record, message_idx, "Message", row)?;
        let lift = rate_field(&record, lift_idx, "Lift", row)?;
        table.upsert(LiftEntry::new(segment, message, lift));
    }

    debug!(entries = table.len(), "Parsed lift upload");
    Ok(table)
}

/// Parse a benchmark upload with columns `Channel, CPM, CTR, CVR`.
pub fn parse_benchmark_csv<R: Read>(reader: R) -> MixSimResult<BenchmarkTable> {
    let mut rdr = csv_reader(reader);
    let headers = rdr.headers()?.clone();
    let channel_idx = require_column(&headers, BENCHMARK_TABLE, "Channel")?;
    let cpm_idx = require_column(&headers, BENCHMARK_TABLE, "CPM")?;
    let ctr_idx = require_column(&headers, BENCHMARK_TABLE, "CTR")?;
    let cvr_idx = require_column(&headers, BENCHMARK_TABLE, "CVR")?;

    let mut table = BenchmarkTable::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i + 1;
        table.upsert(BenchmarkEntry::new(
            text_field(&record, channel_idx, "Channel", row)?,
            rate_field(&record, cpm_idx, "CPM", row)?,
            rate_field(&record, ctr_idx, "CTR", row)?,
            rate_field(&record, cvr_idx, "CVR", row)?,
        ));
    }

    debug!(entries = table.len(), "Parsed benchmark upload");
    Ok(table)
}

pub fn load_lift_csv(path: impl AsRef<Path>) -> MixSimResult<LiftTable> {
    let path = path.as_ref();
    let table = parse_lift_csv(std::fs::File::open(path)?)?;
    info!(path = %path.display(), entries = table.len(), "Loaded lift overrides");
    Ok(table)
}

pub fn load_benchmark_csv(path: impl AsRef<Path>) -> MixSimResult<BenchmarkTable> {
    let path = path.as_ref();
    let table = parse_benchmark_csv(std::fs::File::open(path)?)?;
    info!(path = %path.display(), entries = table.len(), "Loaded benchmark overrides");
    Ok(table)
}

/// Parse `Channel=CPM:CTR:CVR`, e.g. `YouTube=12:0.015:0.08`.
pub fn parse_benchmark_override(spec: &str) -> MixSimResult<BenchmarkEntry> {
    let invalid = || MixSimError::InvalidOverride(spec.to_string());
    let (channel, rates) = spec.split_once('=').ok_or_else(invalid)?;
    let channel = channel.trim();
    let rates: Vec<f64> = rates
        .split(':')
        .map(|v| parse_rate(v).ok_or_else(invalid))
        .collect::<MixSimResult<_>>()?;
    match (channel.is_empty(), rates.as_slice()) {
        (false, [cpm, ctr, cvr]) => Ok(BenchmarkEntry::new(channel, *cpm, *ctr, *cvr)),
        _ => Err(invalid()),
    }
}

/// Parse `Segment/Message=Lift`, e.g. `Tech Moms/Planet First=0.9`.
pub fn parse_lift_override(spec: &str) -> MixSimResult<LiftEntry> {
    let invalid = || MixSimError::InvalidOverride(spec.to_string());
    let (key, lift) = spec.split_once('=').ok_or_else(invalid)?;
    let (segment, message) = key.split_once('/').ok_or_else(invalid)?;
    let (segment, message) = (segment.trim(), message.trim());
    if segment.is_empty() || message.is_empty() {
        return Err(invalid());
    }
    let lift = parse_rate(lift).ok_or_else(invalid)?;
    Ok(LiftEntry::new(segment, message, lift))
}

// -- internal helpers ---------------------------------------------------

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
}

fn require_column(
    headers: &csv::StringRecord,
    table: &'static str,
    column: &'static str,
) -> MixSimResult<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or(MixSimError::MissingColumn { table, column })
}

fn text_field(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> MixSimResult<String> {
    match record.get(idx) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        other => Err(MixSimError::InvalidValue {
            column,
            row,
            value: other.unwrap_or_default().to_string(),
        }),
    }
}

fn rate_field(
    record: &csv::StringRecord,
    idx: usize,
    column: &'static str,
    row: usize,
) -> MixSimResult<f64> {
    let raw = record.get(idx).unwrap_or_default();
    parse_rate(raw).ok_or_else(|| MixSimError::InvalidValue {
        column,
        row,
        value: raw.to_string(),
    })
}

/// Rates, prices, and lifts must be finite and strictly positive.
fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
