// src/table.rs

use serde::Deserialize;

/// Column names of every inventory file, in file order.
pub const COLUMNS: [&str; 5] = ["Region", "Service", "Resource", "Key", "Value"];

/// A single cell value. Kept as opaque text; nothing is parsed or coerced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
}

impl Cell {
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Empty => "",
            Cell::Text(s) => s,
        }
    }

    /// Rendered length in characters, as used for column sizing.
    pub fn display_len(&self) -> usize {
        self.as_str().chars().count()
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::from(s.to_string())
    }
}

/// One inventory record. Deserialised by position from a headerless CSV line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Row {
    pub region: Cell,
    pub service: Cell,
    pub resource: Cell,
    pub key: Cell,
    pub value: Cell,
}

impl Row {
    pub fn new(fields: [&str; 5]) -> Self {
        let [region, service, resource, key, value] = fields.map(Cell::from);
        Row {
            region,
            service,
            resource,
            key,
            value,
        }
    }

    /// Cells in `COLUMNS` order.
    pub fn cells(&self) -> [&Cell; 5] {
        [
            &self.region,
            &self.service,
            &self.resource,
            &self.key,
            &self.value,
        ]
    }
}

/// Every row of every source, in source order then in-file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedTable {
    rows: Vec<Row>,
}

impl CombinedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `rows` after everything already in the table.
    pub fn append(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the data cells of column `idx` (0-based, `COLUMNS` order).
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |r| r.cells()[idx])
    }
}
