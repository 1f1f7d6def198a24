use crate::columns::RequiredColumns;

use super::{Record, Table, Value, MISSING};

/// Positions of the required columns inside one (normalized) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub equipment_name: usize,
    pub kind: usize,
    pub flowrate: usize,
    pub pressure: usize,
    pub temperature: usize,
}

impl ColumnIndex {
    /// Locate every required column, or `None` if any is absent.
    /// Duplicate names resolve to their first occurrence.
    pub fn resolve(table: &Table, required: &RequiredColumns) -> Option<Self> {
        Some(Self {
            equipment_name: table.column_index(&required.equipment_name)?,
            kind: table.column_index(&required.kind)?,
            flowrate: table.column_index(&required.flowrate)?,
            pressure: table.column_index(&required.pressure)?,
            temperature: table.column_index(&required.temperature)?,
        })
    }

    fn ordered(&self) -> [usize; 5] {
        [
            self.equipment_name,
            self.kind,
            self.flowrate,
            self.pressure,
            self.temperature,
        ]
    }

    /// Fixed-schema view of a row.
    pub fn row<'a>(&self, cells: &'a [Value]) -> EquipmentRow<'a> {
        let cell = |i: usize| cells.get(i).unwrap_or(&MISSING);
        EquipmentRow {
            name: cell(self.equipment_name),
            kind: cell(self.kind),
            flowrate: cell(self.flowrate).as_f64(),
            pressure: cell(self.pressure).as_f64(),
            temperature: cell(self.temperature).as_f64(),
        }
    }

    /// The row narrowed to the required columns, in canonical order.
    pub fn record(&self, required: &RequiredColumns, cells: &[Value]) -> Record {
        required
            .ordered()
            .iter()
            .zip(self.ordered())
            .map(|(name, i)| (name.to_string(), cells.get(i).unwrap_or(&MISSING).clone()))
            .collect()
    }
}

/// One equipment reading with the numeric fields already resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EquipmentRow<'a> {
    pub name: &'a Value,
    pub kind: &'a Value,
    pub flowrate: Option<f64>,
    pub pressure: Option<f64>,
    pub temperature: Option<f64>,
}

impl EquipmentRow<'_> {
    /// The trimmed equipment name, or `None` when it is blank or missing.
    pub fn key(&self) -> Option<String> {
        let name = self.name.to_string();
        let trimmed = name.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Label used for the type distribution: the raw value, missing as "".
    pub fn type_label(&self) -> String {
        // missing Types share the "" bucket so the counts sum to the row
        // count; see "Missing Type" in DESIGN.md
        self.kind.to_string()
    }
}
