use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Structural failures of a single table. Bad cells are data, never errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The input could not be read as a delimited table at all.
    #[error("{0}")]
    Parse(String),

    /// The table parsed but lacks at least one required column.
    /// Always carries the full required list, not just the absent names.
    #[error("CSV missing required columns: {required:?}")]
    MissingColumns { required: Vec<String> },
}

/// Result type for single-table operations
pub type AnalysisResult<T> = Result<T, AnalysisError>;

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        AnalysisError::Parse(err.to_string())
    }
}

/// Which input of a comparison an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[serde(rename = "file_a")]
    A,
    #[serde(rename = "file_b")]
    B,
}

impl Side {
    pub fn as_str(&self) -> &str {
        match self {
            Side::A => "file_a",
            Side::B => "file_b",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A comparison failed because one of its inputs is structurally invalid.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{side}: {source}")]
pub struct DiffError {
    pub side: Side,
    #[source]
    pub source: AnalysisError,
}

impl DiffError {
    pub fn new(side: Side, source: AnalysisError) -> Self {
        Self { side, source }
    }
}
