use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// The columns every equipment table must carry, in canonical order.
///
/// This is passed explicitly to the normalizer, the analyzer and the differ so
/// that all three validate and read against the same names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredColumns {
    pub equipment_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub flowrate: String,
    pub pressure: String,
    pub temperature: String,
}

impl Default for RequiredColumns {
    fn default() -> Self {
        Self {
            equipment_name: "Equipment Name".into(),
            kind: "Type".into(),
            flowrate: "Flowrate".into(),
            pressure: "Pressure".into(),
            temperature: "Temperature".into(),
        }
    }
}

impl RequiredColumns {
    /// Name, Type, Flowrate, Pressure, Temperature.
    pub fn ordered(&self) -> [&str; 5] {
        [
            &self.equipment_name,
            &self.kind,
            &self.flowrate,
            &self.pressure,
            &self.temperature,
        ]
    }

    /// The columns coerced to floating point.
    pub fn numeric(&self) -> [&str; 3] {
        [&self.flowrate, &self.pressure, &self.temperature]
    }

    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric().contains(&column)
    }

    /// Name and Type: identifier columns whose cell text is kept verbatim.
    pub fn is_label(&self, column: &str) -> bool {
        column == self.equipment_name || column == self.kind
    }

    /// Required names absent from `columns` (exact, case-sensitive match).
    pub fn missing_from<'a>(&'a self, columns: &[String]) -> Vec<&'a str> {
        self.ordered()
            .into_iter()
            .filter(|name| !columns.iter().any(|c| c == name))
            .collect()
    }

    /// The error reported when any required column is absent.
    pub fn missing_error(&self) -> AnalysisError {
        AnalysisError::MissingColumns {
            required: self.ordered().iter().map(|s| s.to_string()).collect(),
        }
    }
}
