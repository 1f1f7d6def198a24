// src/table/mod.rs
pub mod equipment;
pub mod normalize;
pub mod reader;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

pub use equipment::{ColumnIndex, EquipmentRow};
pub use normalize::normalize;
pub use reader::read_csv;

/// One cell of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

pub(crate) static MISSING: Value = Value::Missing;

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric reading of the cell. Text is parsed after trimming; anything
    /// that does not yield a finite number reads as `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            Value::Number(n) => *n,
            Value::Text(s) => s.trim().parse::<f64>().ok()?,
            Value::Missing => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Missing, Value::Number)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // whole numbers print without a trailing ".0"
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Missing => Ok(()),
        }
    }
}

/// Rows of cells under a header, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column names as given by the header row.
    pub columns: Vec<String>,
    /// One `Vec<Value>` per data row, aligned with `columns`.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column called exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The `row`-th data row as a column → value mapping, all columns in header order.
    pub fn record(&self, row: usize) -> Option<Record> {
        self.rows.get(row).map(|cells| {
            self.columns
                .iter()
                .enumerate()
                .map(|(i, col)| (col.clone(), cells.get(i).unwrap_or(&MISSING).clone()))
                .collect()
        })
    }
}

/// An ordered column → value mapping. Serialises as a JSON object whose keys
/// keep the column order they were inserted in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(Vec<(String, Value)>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.0.push((column.into(), value));
    }

    /// First value stored under `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (col, value) in &self.0 {
            map.serialize_entry(col, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column names to cell values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((col, value)) = access.next_entry::<String, Value>()? {
                    entries.push((col, value));
                }
                Ok(Record(entries))
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_reads_numbers_leniently() {
        assert_eq!(Value::from(" 12.5 ").as_f64(), Some(12.5));
        assert_eq!(Value::from("n/a").as_f64(), None);
        assert_eq!(Value::from("NaN").as_f64(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_f64(), None);
        assert_eq!(Value::Missing.as_f64(), None);
    }

    #[test]
    fn value_display_drops_integral_fraction() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(7.25).to_string(), "7.25");
        assert_eq!(Value::Missing.to_string(), "");
        assert_eq!(Value::from("Pump").to_string(), "Pump");
    }

    #[test]
    fn value_json_shape() {
        let cells = vec![Value::Number(1.5), Value::from("Valve"), Value::Missing];
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"[1.5,"Valve",null]"#);
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cells);
    }

    #[test]
    fn record_keeps_column_order_in_json() {
        let mut rec = Record::new();
        rec.push("Zeta", Value::Number(1.0));
        rec.push("Alpha", Value::from("a"));
        rec.push("Mid", Value::Missing);

        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"Zeta":1.0,"Alpha":"a","Mid":null}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back.columns().collect::<Vec<_>>(), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(back, rec);
    }

    #[test]
    fn table_record_pads_short_rows() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Number(1.0)]],
        );
        let rec = table.record(0).unwrap();
        assert_eq!(rec.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(rec.get("b"), Some(&Value::Missing));
        assert!(table.record(1).is_none());
    }
}
