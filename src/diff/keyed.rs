use std::collections::{btree_map::Entry, BTreeMap};
use tracing::{debug, trace};

use crate::table::EquipmentRow;

/// Rows of one table keyed by equipment name.
///
/// The first row seen for a name is kept; later rows with the same name are
/// shadowed. Rows without a usable name are left out.
#[derive(Debug, Default)]
pub struct KeyedRows<'a> {
    rows: BTreeMap<String, EquipmentRow<'a>>,
    shadowed: usize,
    unnamed: usize,
}

impl<'a> KeyedRows<'a> {
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = EquipmentRow<'a>>,
    {
        let mut keyed = KeyedRows::default();
        for row in rows {
            let Some(key) = row.key() else {
                keyed.unnamed += 1;
                continue;
            };
            match keyed.rows.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(first) => {
                    trace!(key = %first.key(), "duplicate equipment name shadowed");
                    keyed.shadowed += 1;
                }
            }
        }
        if keyed.shadowed > 0 || keyed.unnamed > 0 {
            debug!(
                kept = keyed.rows.len(),
                shadowed = keyed.shadowed,
                unnamed = keyed.unnamed,
                "keyed rows"
            );
        }
        keyed
    }

    pub fn get(&self, key: &str) -> Option<&EquipmentRow<'a>> {
        self.rows.get(key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows dropped because an earlier row had the same name.
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }

    /// Rows dropped because their name was blank or missing.
    pub fn unnamed(&self) -> usize {
        self.unnamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Value, MISSING};

    fn row(name: &Value, flow: f64) -> EquipmentRow<'_> {
        EquipmentRow {
            name,
            kind: &MISSING,
            flowrate: Some(flow),
            pressure: None,
            temperature: None,
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let a = Value::from("Pump-1");
        let b = Value::from(" Pump-1 ");
        let keyed = KeyedRows::build([row(&a, 1.0), row(&b, 2.0)]);

        assert_eq!(keyed.len(), 1);
        assert_eq!(keyed.shadowed(), 1);
        assert_eq!(keyed.get("Pump-1").unwrap().flowrate, Some(1.0));
    }

    #[test]
    fn blank_names_are_excluded() {
        let blank = Value::from("  ");
        let missing = Value::Missing;
        let named = Value::from("V1");
        let keyed = KeyedRows::build([row(&blank, 1.0), row(&missing, 2.0), row(&named, 3.0)]);

        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["V1"]);
        assert_eq!(keyed.unnamed(), 2);
    }

    #[test]
    fn keys_are_sorted() {
        let names: Vec<Value> = ["b", "C", "a"].iter().map(|s| Value::from(*s)).collect();
        let keyed = KeyedRows::build(names.iter().map(|n| row(n, 0.0)));
        assert_eq!(keyed.keys().collect::<Vec<_>>(), vec!["C", "a", "b"]);
    }
}
