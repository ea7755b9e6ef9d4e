//! Simulation reporting — Looker Studio CSV export, JSON run reports, and
//! terminal tables.

pub mod export;
pub mod table;

pub use export::{to_csv, write_csv, SimulationReport, CSV_HEADER, EXPORT_FILE_NAME, EXPORT_MIME};
pub use table::{render_results, render_summary};
