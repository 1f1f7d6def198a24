// src/analyze/mod.rs
pub mod stats;

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub use stats::{Averages, Stats};

use crate::{
    columns::RequiredColumns,
    config::Settings,
    error::AnalysisResult,
    numeric::mean,
    table::{normalize, ColumnIndex, EquipmentRow, Table},
};

/// Rows kept in [`Stats::preview`] unless configured otherwise.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Computes [`Stats`] for one table against a fixed set of required columns.
#[derive(Debug, Clone)]
pub struct Analyzer {
    columns: RequiredColumns,
    preview_rows: usize,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(RequiredColumns::default())
    }
}

impl Analyzer {
    pub fn new(columns: RequiredColumns) -> Self {
        Self {
            columns,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.columns.clone()).with_preview_rows(settings.preview_rows)
    }

    pub fn with_preview_rows(mut self, preview_rows: usize) -> Self {
        self.preview_rows = preview_rows;
        self
    }

    pub fn columns(&self) -> &RequiredColumns {
        &self.columns
    }

    /// Normalize `table`, check the required columns and summarise it.
    /// `file_id` and `uploaded_at` are copied into the result as given.
    #[tracing::instrument(level = "debug", skip_all, fields(rows = table.len()))]
    pub fn analyze(
        &self,
        table: &Table,
        file_id: Option<serde_json::Value>,
        uploaded_at: Option<DateTime<Utc>>,
    ) -> AnalysisResult<Stats> {
        let normalized = normalize(table, &self.columns);
        self.analyze_normalized(&normalized, file_id, uploaded_at)
    }

    /// Same as [`Analyzer::analyze`] for a table that is already normalized.
    pub(crate) fn analyze_normalized(
        &self,
        table: &Table,
        file_id: Option<serde_json::Value>,
        uploaded_at: Option<DateTime<Utc>>,
    ) -> AnalysisResult<Stats> {
        let index = self.resolve(table)?;
        let rows: Vec<EquipmentRow<'_>> = table.rows.iter().map(|r| index.row(r)).collect();

        let averages = Averages {
            flowrate: mean(rows.iter().map(|r| r.flowrate)),
            pressure: mean(rows.iter().map(|r| r.pressure)),
            temperature: mean(rows.iter().map(|r| r.temperature)),
        };

        let mut type_distribution: BTreeMap<String, usize> = BTreeMap::new();
        for row in &rows {
            *type_distribution.entry(row.type_label()).or_insert(0) += 1;
        }

        let preview = (0..table.len().min(self.preview_rows))
            .filter_map(|i| table.record(i))
            .collect();
        let records = table
            .rows
            .iter()
            .map(|cells| index.record(&self.columns, cells))
            .collect();

        debug!(
            total = rows.len(),
            types = type_distribution.len(),
            ?averages,
            "analyzed table"
        );

        Ok(Stats {
            total_count: rows.len(),
            averages,
            type_distribution,
            preview,
            records,
            file_id,
            uploaded_at,
        })
    }

    /// Required-column gate over a normalized table.
    pub(crate) fn resolve(&self, table: &Table) -> AnalysisResult<ColumnIndex> {
        ColumnIndex::resolve(table, &self.columns).ok_or_else(|| {
            warn!(
                missing = ?self.columns.missing_from(&table.columns),
                "table lacks required columns"
            );
            self.columns.missing_error()
        })
    }
}
