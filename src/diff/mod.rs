// src/diff/mod.rs
pub mod keyed;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, info};

pub use keyed::KeyedRows;

use crate::{
    analyze::{Analyzer, Stats},
    error::{DiffError, Side},
    numeric::delta,
    table::{normalize, EquipmentRow, Table, Value},
};

/// Outcome for one equipment name across the two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Same,
    Changed,
    OnlyInA,
    OnlyInB,
}

impl DiffStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DiffStatus::Same => "same",
            DiffStatus::Changed => "changed",
            DiffStatus::OnlyInA => "only_in_a",
            DiffStatus::OnlyInB => "only_in_b",
        }
    }

    pub fn in_both(&self) -> bool {
        matches!(self, DiffStatus::Same | DiffStatus::Changed)
    }
}

impl fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One equipment name's values on each side and their differences (B − A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRow {
    pub equipment_name: String,
    pub type_a: Option<Value>,
    pub type_b: Option<Value>,
    pub flowrate_a: Option<f64>,
    pub flowrate_b: Option<f64>,
    pub flowrate_delta: Option<f64>,
    pub pressure_a: Option<f64>,
    pub pressure_b: Option<f64>,
    pub pressure_delta: Option<f64>,
    pub temperature_a: Option<f64>,
    pub temperature_b: Option<f64>,
    pub temperature_delta: Option<f64>,
    pub status: DiffStatus,
}

impl DiffRow {
    fn between(key: &str, a: Option<&EquipmentRow<'_>>, b: Option<&EquipmentRow<'_>>) -> Self {
        let (flowrate_a, flowrate_b) = (a.and_then(|r| r.flowrate), b.and_then(|r| r.flowrate));
        let (pressure_a, pressure_b) = (a.and_then(|r| r.pressure), b.and_then(|r| r.pressure));
        let (temperature_a, temperature_b) =
            (a.and_then(|r| r.temperature), b.and_then(|r| r.temperature));

        let flowrate_delta = delta(flowrate_a, flowrate_b);
        let pressure_delta = delta(pressure_a, pressure_b);
        let temperature_delta = delta(temperature_a, temperature_b);

        let status = match (a, b) {
            (None, _) => DiffStatus::OnlyInB,
            (_, None) => DiffStatus::OnlyInA,
            _ => {
                // a field without a delta on either side does not count as a change
                let unchanged = [flowrate_delta, pressure_delta, temperature_delta]
                    .iter()
                    .all(|d| d.map_or(true, |d| d == 0.0));
                if unchanged {
                    DiffStatus::Same
                } else {
                    DiffStatus::Changed
                }
            }
        };

        DiffRow {
            equipment_name: key.to_string(),
            type_a: a.and_then(type_of),
            type_b: b.and_then(type_of),
            flowrate_a,
            flowrate_b,
            flowrate_delta,
            pressure_a,
            pressure_b,
            pressure_delta,
            temperature_a,
            temperature_b,
            temperature_delta,
            status,
        }
    }
}

fn type_of(row: &EquipmentRow<'_>) -> Option<Value> {
    (!row.kind.is_missing()).then(|| row.kind.clone())
}

/// Row counts by status. `in_both` covers `same` and `changed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub only_in_a: usize,
    pub only_in_b: usize,
    pub in_both: usize,
}

impl DiffSummary {
    pub fn tally(rows: &[DiffRow]) -> Self {
        rows.iter().fold(DiffSummary::default(), |mut s, row| {
            match row.status {
                status if status.in_both() => s.in_both += 1,
                DiffStatus::OnlyInA => s.only_in_a += 1,
                _ => s.only_in_b += 1,
            }
            s
        })
    }

    pub fn total(&self) -> usize {
        self.only_in_a + self.only_in_b + self.in_both
    }
}

/// Per-name reconciliation of two tables, ordered by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DiffReport {
    pub summary: DiffSummary,
    pub rows: Vec<DiffRow>,
}

impl DiffReport {
    /// Rows with the given status, in report order.
    pub fn with_status(&self, status: DiffStatus) -> impl Iterator<Item = &DiffRow> {
        self.rows.iter().filter(move |r| r.status == status)
    }
}

/// Both tables' statistics together with their diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub file_a: Stats,
    pub file_b: Stats,
    pub diff: DiffReport,
}

/// Reconciles two equipment tables by name.
#[derive(Debug, Clone, Default)]
pub struct Differ {
    analyzer: Analyzer,
}

impl Differ {
    pub fn new(analyzer: Analyzer) -> Self {
        Self { analyzer }
    }

    /// Diff `a` against `b`. Both tables must pass analysis first; when both
    /// fail, side A's error is the one reported.
    pub fn diff(&self, a: &Table, b: &Table) -> Result<DiffReport, DiffError> {
        self.compare(a, b).map(|c| c.diff)
    }

    /// Statistics for both tables plus their diff.
    #[tracing::instrument(level = "info", skip_all, fields(rows_a = a.len(), rows_b = b.len()))]
    pub fn compare(&self, a: &Table, b: &Table) -> Result<Comparison, DiffError> {
        let columns = self.analyzer.columns();
        let (norm_a, norm_b) = (normalize(a, columns), normalize(b, columns));

        let (stats_a, stats_b) = rayon::join(
            || self.analyzer.analyze_normalized(&norm_a, None, None),
            || self.analyzer.analyze_normalized(&norm_b, None, None),
        );
        let file_a = stats_a.map_err(|e| DiffError::new(Side::A, e))?;
        let file_b = stats_b.map_err(|e| DiffError::new(Side::B, e))?;

        let index_a = self
            .analyzer
            .resolve(&norm_a)
            .map_err(|e| DiffError::new(Side::A, e))?;
        let index_b = self
            .analyzer
            .resolve(&norm_b)
            .map_err(|e| DiffError::new(Side::B, e))?;

        let left = KeyedRows::build(norm_a.rows.iter().map(|r| index_a.row(r)));
        let right = KeyedRows::build(norm_b.rows.iter().map(|r| index_b.row(r)));
        let diff = reconcile(&left, &right);

        info!(
            only_in_a = diff.summary.only_in_a,
            only_in_b = diff.summary.only_in_b,
            in_both = diff.summary.in_both,
            "compared tables"
        );
        Ok(Comparison {
            file_a,
            file_b,
            diff,
        })
    }
}

/// Walk the sorted union of names and classify each.
pub fn reconcile(left: &KeyedRows<'_>, right: &KeyedRows<'_>) -> DiffReport {
    let names: BTreeSet<&str> = left.keys().chain(right.keys()).collect();
    let rows: Vec<DiffRow> = names
        .into_iter()
        .map(|name| DiffRow::between(name, left.get(name), right.get(name)))
        .collect();
    let summary = DiffSummary::tally(&rows);
    debug!(rows = rows.len(), ?summary, "reconciled");
    DiffReport { summary, rows }
}
