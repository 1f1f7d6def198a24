use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::table::Record;

/// Mean of each numeric field, rounded. `None` when the field had no values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    pub flowrate: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

/// Summary of one equipment table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_count: usize,
    pub averages: Averages,
    /// Type label → number of rows carrying it.
    pub type_distribution: BTreeMap<String, usize>,
    /// Leading rows with every column of the input.
    pub preview: Vec<Record>,
    /// Every row, narrowed to the required columns.
    pub records: Vec<Record>,
    /// Identifier of the stored dataset, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Stats {
    /// Distinct non-empty type labels, sorted.
    pub fn types(&self) -> Vec<&str> {
        self.type_distribution
            .keys()
            .map(String::as_str)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Records whose `type_column` value is one of `labels`.
    /// An empty `labels` slice matches every record.
    pub fn records_of_type<'a>(
        &'a self,
        type_column: &'a str,
        labels: &'a [String],
    ) -> impl Iterator<Item = &'a Record> + 'a {
        filter_by_type(&self.records, type_column, labels)
    }

    /// Preview rows whose `type_column` value is one of `labels`.
    pub fn preview_of_type<'a>(
        &'a self,
        type_column: &'a str,
        labels: &'a [String],
    ) -> impl Iterator<Item = &'a Record> + 'a {
        filter_by_type(&self.preview, type_column, labels)
    }
}

fn filter_by_type<'a>(
    records: &'a [Record],
    type_column: &'a str,
    labels: &'a [String],
) -> impl Iterator<Item = &'a Record> + 'a {
    records.iter().filter(move |rec| {
        labels.is_empty()
            || rec
                .get(type_column)
                .map(|v| v.to_string())
                .is_some_and(|t| labels.iter().any(|l| *l == t))
    })
}
