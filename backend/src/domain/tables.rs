//! Tabular model of the backing store.
//!
//! The store is treated as a set of named sheets. Each sheet has a fixed
//! header row followed by data rows of loosely typed cells, mirroring what a
//! spreadsheet would hold. Rows may be shorter than the header; reading past
//! the end of a row yields an empty cell.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable names of the three persisted tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableName {
    /// One row per user.
    Users,
    /// One row per property record.
    Properties,
    /// One row per scalar or list setting.
    Masters,
}

impl TableName {
    /// Every table in write order.
    pub const ALL: [Self; 3] = [Self::Users, Self::Properties, Self::Masters];

    /// Name used to address the table in the store.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Properties => "properties",
            Self::Masters => "masters",
        }
    }

    /// Fixed header row for the table.
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["id", "name", "pass", "role", "data"],
            Self::Properties => &["id", "data"],
            Self::Masters => &["key", "value", "type", "data"],
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single stored value.
///
/// Serialises untagged so a row round-trips through JSON as a plain array
/// such as `["zoom", 1.5, "number", 1.5]`, with `null` for empty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    /// No value.
    #[default]
    Empty,
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Build a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Whether the cell holds nothing, or only an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Render the cell as text, the way a spreadsheet displays it.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Empty => Cow::Borrowed(""),
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Number(number) => Cow::Owned(number.to_string()),
        }
    }

    /// Convert the cell into a JSON scalar. Empty cells read as `""`.
    ///
    /// Whole numbers within the exactly representable `f64` range come back
    /// as JSON integers so an id saved as `5` does not load as `5.0`.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Empty => Value::String(String::new()),
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) if is_whole(*number) => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "is_whole bounds the value to the exact integer range"
                )]
                let whole = *number as i64;
                Value::from(whole)
            }
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map_or(Value::Null, Value::Number),
        }
    }
}

const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn is_whole(number: f64) -> bool {
    number.fract() == 0.0 && number.abs() <= MAX_EXACT_INTEGER
}

impl From<&Value> for Cell {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(text) => Self::Text(text.clone()),
            Value::Number(number) => number
                .as_f64()
                .map_or_else(|| Self::Text(number.to_string()), Self::Number),
            other => Self::Text(other.to_string()),
        }
    }
}

/// One data row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Vec<Cell>);

impl Row {
    /// Build a row from its cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    /// Cell at `index`, or an empty cell when the row is shorter.
    pub fn cell(&self, index: usize) -> &Cell {
        self.0.get(index).unwrap_or(&EMPTY_CELL)
    }

    /// Overwrite the cell at `index`, padding the row when needed.
    pub fn set_cell(&mut self, index: usize, cell: Cell) {
        if self.0.len() <= index {
            self.0.resize(index + 1, Cell::Empty);
        }
        if let Some(slot) = self.0.get_mut(index) {
            *slot = cell;
        }
    }

    /// All cells in column order.
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }
}

impl From<Vec<Cell>> for Row {
    fn from(cells: Vec<Cell>) -> Self {
        Self(cells)
    }
}

/// Header plus data rows of one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table carrying the fixed header for `name`.
    pub fn with_header(name: TableName) -> Self {
        Self {
            header: name.columns().iter().map(|&column| column.to_owned()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rebuild a table from raw header and rows, as read back from a store.
    pub fn from_parts(header: Vec<String>, rows: Vec<Row>) -> Self {
        Self { header, rows }
    }

    /// Append a data row.
    pub fn push_row(&mut self, row: impl Into<Row>) {
        self.rows.push(row.into());
    }

    /// Header cells.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, excluding the header.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to the data rows.
    pub fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
