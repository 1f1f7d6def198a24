use csv::ReaderBuilder;
use std::io::Read;
use tracing::debug;

use super::{Table, Value};
use crate::error::{AnalysisError, AnalysisResult};

/// Parse comma-delimited text with a header row into a [`Table`].
///
/// - The first record names the columns; names are kept verbatim.
/// - Records longer than the header are a parse error; shorter ones are
///   padded with `Missing`.
/// - Empty cells become `Missing`; every other cell is kept as `Text`,
///   byte for byte. Numbers are recognised later by [`normalize`], which
///   knows which columns are identifiers.
///
/// [`normalize`]: super::normalize
#[tracing::instrument(level = "debug", skip(input))]
pub fn read_csv<R: Read>(input: R) -> AnalysisResult<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // short records are padded below, long ones rejected
        .from_reader(input);

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() {
        return Err(AnalysisError::Parse("No columns to parse from file".into()));
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        if record.len() > columns.len() {
            // header is line 1, so the n-th data record is at least line n + 2
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 2);
            return Err(AnalysisError::Parse(format!(
                "Expected {} fields in line {}, saw {}",
                columns.len(),
                line,
                record.len()
            )));
        }
        rows.push(
            (0..columns.len())
                .map(|i| record.get(i).map_or(Value::Missing, to_value))
                .collect(),
        );
    }

    debug!(columns = columns.len(), rows = rows.len(), "read table");
    Ok(Table::new(columns, rows))
}

impl Table {
    /// Parse an in-memory CSV document.
    pub fn from_csv_str(text: &str) -> AnalysisResult<Self> {
        read_csv(text.as_bytes())
    }
}

fn to_value(cell: &str) -> Value {
    if cell.is_empty() {
        Value::Missing
    } else {
        Value::Text(cell.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_header_and_cells_verbatim() {
        let text = "Equipment Name,Type,Flowrate,Notes\nP1,Pump,10,ok\nV1,Valve,,12\nC1,Compressor,7.5,\n";
        let table = Table::from_csv_str(text).unwrap();

        assert_eq!(table.columns, vec!["Equipment Name", "Type", "Flowrate", "Notes"]);
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0][2], Value::from("10"));
        assert_eq!(table.rows[1][2], Value::Missing);
        assert_eq!(table.rows[2][2], Value::from("7.5"));
        assert_eq!(table.rows[0][3], Value::from("ok"));
        assert_eq!(table.rows[2][3], Value::Missing);
    }

    #[test]
    fn numeric_looking_labels_keep_their_text() {
        let text = "Equipment Name,Type\n1.0,007\n1e3,2\n 42 ,\n";
        let table = Table::from_csv_str(text).unwrap();

        assert_eq!(table.rows[0], vec![Value::from("1.0"), Value::from("007")]);
        assert_eq!(table.rows[1], vec![Value::from("1e3"), Value::from("2")]);
        assert_eq!(table.rows[2], vec![Value::from(" 42 "), Value::Missing]);
    }

    #[test]
    fn header_names_are_not_trimmed_here() {
        let table = Table::from_csv_str(" Flowrate ,Type\n1,Pump\n").unwrap();
        assert_eq!(table.columns, vec![" Flowrate ", "Type"]);
    }

    #[test]
    fn short_records_are_padded() {
        let table = Table::from_csv_str("a,b,c\n1,2\n").unwrap();
        assert_eq!(
            table.rows[0],
            vec![Value::from("1"), Value::from("2"), Value::Missing]
        );
    }

    #[test]
    fn long_records_are_rejected() {
        let err = Table::from_csv_str("a,b\n1,2\n1,2,3\n").unwrap_err();
        assert_eq!(
            err,
            AnalysisError::Parse("Expected 2 fields in line 3, saw 3".into())
        );
    }

    #[test]
    fn empty_input_has_no_columns() {
        let err = Table::from_csv_str("").unwrap_err();
        assert_eq!(err, AnalysisError::Parse("No columns to parse from file".into()));
    }

    #[test]
    fn header_only_is_an_empty_table() {
        let table =
            Table::from_csv_str("Equipment Name,Type,Flowrate,Pressure,Temperature\n").unwrap();
        assert_eq!(table.columns.len(), 5);
        assert!(table.is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let bytes: &[u8] = b"a,b\n\xff\xfe,1\n";
        match read_csv(bytes) {
            Err(AnalysisError::Parse(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
