//! Derived tables: the hand-off format between queries and renderers.

use serde::{Deserialize, Serialize};

use super::{Field, Observation};

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    /// Missing values serialize as `null`.
    Number(Option<f64>),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Text(_) => None,
            Cell::Int(i) => Some(*i as f64),
            Cell::Number(n) => *n,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Column descriptor: machine key plus display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

impl From<Field> for Column {
    fn from(field: Field) -> Self {
        Column::new(field.key(), field.label())
    }
}

/// A small rectangular table ready for rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Project observations onto the given fields, preserving row order.
    pub fn project<'a, I>(rows: I, fields: &[Field]) -> Self
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        let columns = fields.iter().map(|f| Column::from(*f)).collect();
        let rows = rows
            .into_iter()
            .map(|obs| fields.iter().map(|f| f.cell(obs)).collect())
            .collect();
        Self { columns, rows }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    /// All cells of one column, top to bottom.
    pub fn column(&self, key: &str) -> Option<Vec<&Cell>> {
        let idx = self.column_index(key)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }
}
