use std::iter;
use tracing::debug;

use super::{Table, Value, MISSING};
use crate::columns::RequiredColumns;

/// How one column's cells are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cells {
    /// Parse every cell as a number; anything else becomes `Missing`.
    Coerce,
    /// Leave every cell as it is.
    Keep,
}

/// Canonical form of a table:
/// - every column name trimmed of surrounding whitespace
/// - cells of the numeric required columns coerced to `Number`, or `Missing`
///   when they do not parse
/// - Name and Type cells left untouched, so identifiers such as `1.0` or
///   `007` keep their text
/// - any other column whose every present cell is a finite number read as
///   numbers, otherwise left as text
/// - every row exactly as wide as the header
///
/// Rows are neither dropped nor reordered. Normalizing twice is a no-op.
pub fn normalize(table: &Table, required: &RequiredColumns) -> Table {
    let columns: Vec<String> = table.columns.iter().map(|c| c.trim().to_string()).collect();
    let treatment: Vec<Cells> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let numeric = required.is_numeric(c)
                || (!required.is_label(c) && is_numeric_column(table, i));
            if numeric {
                Cells::Coerce
            } else {
                Cells::Keep
            }
        })
        .collect();

    let rows: Vec<Vec<Value>> = table
        .rows
        .iter()
        .map(|cells| {
            cells
                .iter()
                .chain(iter::repeat(&MISSING))
                .zip(&treatment)
                .map(|(cell, how)| match how {
                    Cells::Coerce => Value::from(cell.as_f64()),
                    Cells::Keep => cell.clone(),
                })
                .collect()
        })
        .collect();

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        coerced = treatment.iter().filter(|t| **t == Cells::Coerce).count(),
        "normalized table"
    );
    Table::new(columns, rows)
}

/// True when column `idx` has at least one present cell and every present
/// cell reads as a finite number.
fn is_numeric_column(table: &Table, idx: usize) -> bool {
    let mut seen = false;
    for cell in table.rows.iter().filter_map(|r| r.get(idx)) {
        if cell.is_missing() {
            continue;
        }
        if cell.as_f64().is_none() {
            return false;
        }
        seen = true;
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn trims_column_names() {
        let raw = Table::new(cols(&[" Equipment Name", "Flowrate  ", "\tType"]), vec![]);
        let t = normalize(&raw, &RequiredColumns::default());
        assert_eq!(t.columns, cols(&["Equipment Name", "Flowrate", "Type"]));
    }

    #[test]
    fn coerces_only_numeric_columns() {
        let raw = Table::new(
            cols(&["Type", " Flowrate ", "Pressure", "Temperature"]),
            vec![
                vec![
                    Value::from("12"),
                    Value::from(" 3.5"),
                    Value::from("high"),
                    Value::Number(40.0),
                ],
                vec![Value::from("Pump"), Value::Missing, Value::from("")],
            ],
        );
        let t = normalize(&raw, &RequiredColumns::default());

        // Type is left as text even if it looks numeric
        assert_eq!(t.rows[0][0], Value::from("12"));
        assert_eq!(t.rows[0][1], Value::Number(3.5));
        assert_eq!(t.rows[0][2], Value::Missing);
        assert_eq!(t.rows[0][3], Value::Number(40.0));
        // the short row is padded, its bad cells degrade to Missing
        assert_eq!(
            t.rows[1],
            vec![Value::from("Pump"), Value::Missing, Value::Missing, Value::Missing]
        );
    }

    #[test]
    fn keeps_row_and_column_order() {
        let raw = Table::new(
            cols(&["Zeta", "Alpha"]),
            vec![
                vec![Value::from("b"), Value::from("1x")],
                vec![Value::from("a"), Value::from("2x")],
            ],
        );
        let t = normalize(&raw, &RequiredColumns::default());
        assert_eq!(t, raw);
    }

    #[test]
    fn labels_keep_numeric_looking_text() {
        let raw = Table::new(
            cols(&["Equipment Name ", " Type"]),
            vec![
                vec![Value::from("1.0"), Value::from("007")],
                vec![Value::from("1e3"), Value::from("2")],
            ],
        );
        let t = normalize(&raw, &RequiredColumns::default());
        assert_eq!(t.rows, raw.rows);
    }

    #[test]
    fn other_columns_are_numeric_only_when_every_cell_is() {
        let raw = Table::new(
            cols(&["Hours", "Notes"]),
            vec![
                vec![Value::from(" 12"), Value::from("12")],
                vec![Value::Missing, Value::from("ok")],
                vec![Value::from("7.5"), Value::Missing],
            ],
        );
        let t = normalize(&raw, &RequiredColumns::default());

        let hours: Vec<&Value> = t.rows.iter().map(|r| &r[0]).collect();
        assert_eq!(
            hours,
            vec![&Value::Number(12.0), &Value::Missing, &Value::Number(7.5)]
        );
        let notes: Vec<&Value> = t.rows.iter().map(|r| &r[1]).collect();
        assert_eq!(
            notes,
            vec![&Value::from("12"), &Value::from("ok"), &Value::Missing]
        );
    }

    #[test]
    fn is_idempotent() {
        let raw = Table::new(
            cols(&[" Flowrate", "Pressure ", "Equipment Name"]),
            vec![
                vec![Value::from("1e3"), Value::from("x"), Value::from(" P1 ")],
                vec![Value::Number(2.0)],
            ],
        );
        let req = RequiredColumns::default();
        let once = normalize(&raw, &req);
        let twice = normalize(&once, &req);
        assert_eq!(once, twice);
    }
}
