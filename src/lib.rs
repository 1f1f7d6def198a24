//! Summary statistics and name-keyed comparison for equipment sensor tables
//! (equipment name, type, flowrate, pressure, temperature).
//!
//! Raw CSV text is read into a [`Table`], normalized, then either summarised
//! by an [`Analyzer`] or reconciled against a second table by a [`Differ`].

pub mod analyze;
pub mod columns;
pub mod config;
pub mod diff;
pub mod error;
pub mod numeric;
pub mod table;

pub use analyze::{Analyzer, Averages, Stats};
pub use columns::RequiredColumns;
pub use config::Settings;
pub use diff::{Comparison, DiffReport, DiffRow, DiffStatus, DiffSummary, Differ};
pub use error::{AnalysisError, AnalysisResult, DiffError, Side};
pub use table::{normalize, read_csv, Record, Table, Value};

use chrono::{DateTime, Utc};

/// [`Analyzer::analyze`] with the standard column set.
pub fn analyze(
    table: &Table,
    file_id: Option<serde_json::Value>,
    uploaded_at: Option<DateTime<Utc>>,
) -> AnalysisResult<Stats> {
    Analyzer::default().analyze(table, file_id, uploaded_at)
}

/// [`Differ::diff`] with the standard column set.
pub fn diff(a: &Table, b: &Table) -> Result<DiffReport, DiffError> {
    Differ::default().diff(a, b)
}

/// [`Differ::compare`] with the standard column set.
pub fn compare(a: &Table, b: &Table) -> Result<Comparison, DiffError> {
    Differ::default().compare(a, b)
}
