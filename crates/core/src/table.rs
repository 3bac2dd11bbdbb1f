//! Record tables: ordered columns over ordered rows of optional string cells.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::{TableError, TableResult};

/// A single cell. `None` means the value is absent (null / key missing).
pub type Cell = Option<String>;

/// Loosely-typed table as delivered by a board feed.
///
/// Columns are not declared by any schema; they are whatever the feed carried,
/// in first-appearance order. Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Borrowed view of one row.
#[derive(Debug, Copy, Clone)]
pub struct Row<'a> {
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    /// Cell value at a column index; `None` when absent or out of range.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }
}

impl RecordTable {
    /// Create an empty table with declared columns.
    pub fn new<I, S>(columns: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut declared: Vec<String> = Vec::new();
        for c in columns {
            let c = c.into();
            if declared.contains(&c) {
                return Err(TableError::DuplicateColumn(c));
            }
            declared.push(c);
        }
        Ok(Self {
            columns: declared,
            rows: Vec::new(),
        })
    }

    /// Append a dense row (one cell per declared column).
    pub fn push_row(&mut self, cells: Vec<Cell>) -> TableResult<()> {
        if cells.len() != self.columns.len() {
            return Err(TableError::RowWidth {
                index: self.rows.len(),
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        self.rows.push(cells);
        Ok(())
    }

    /// Build a table from keyed records.
    ///
    /// The column set is the union of keys in first-appearance order; keys a
    /// record lacks become absent cells. A key repeated inside one record keeps
    /// its last value.
    pub fn from_records<I, R, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, Option<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut rows: Vec<Vec<Cell>> = Vec::new();

        for record in records {
            let mut row: Vec<Cell> = vec![None; columns.len()];
            for (key, value) in record {
                let key = key.into();
                let idx = match positions.get(&key) {
                    Some(idx) => *idx,
                    None => {
                        let idx = columns.len();
                        positions.insert(key.clone(), idx);
                        columns.push(key);
                        idx
                    }
                };
                if row.len() <= idx {
                    row.resize(idx + 1, None);
                }
                row[idx] = value.map(Into::into);
            }
            rows.push(row);
        }

        let width = columns.len();
        for row in &mut rows {
            row.resize(width, None);
        }

        Self { columns, rows }
    }

    /// Build a table from a JSON array of objects.
    ///
    /// Strings are kept as-is, `null` becomes an absent cell, and any other
    /// scalar or nested value is kept as its compact JSON text. An element that
    /// is not an object is a [`TableError::MalformedRow`].
    pub fn from_json(payload: &JsonValue) -> TableResult<Self> {
        let items = payload.as_array().ok_or_else(|| {
            TableError::invalid_payload(format!(
                "expected an array of rows, found {}",
                json_kind(payload)
            ))
        })?;

        let mut records: Vec<Vec<(String, Option<String>)>> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let object = item
                .as_object()
                .ok_or_else(|| TableError::malformed_row(index, json_kind(item)))?;
            records.push(
                object
                    .iter()
                    .map(|(k, v)| (k.clone(), json_cell(v)))
                    .collect(),
            );
        }

        Ok(Self::from_records(records))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Rows × columns.
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.columns.len()
    }

    /// Count of absent cells across the whole table.
    pub fn missing_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.iter().filter(|c| c.is_none()).count())
            .sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|r| Row { cells: r })
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|r| Row { cells: r })
    }

    /// Rewrite every cell; `f` receives the column name and the current cell.
    pub fn map_cells<F>(mut self, mut f: F) -> Self
    where
        F: FnMut(&str, Cell) -> Cell,
    {
        for row in &mut self.rows {
            for (idx, cell) in row.iter_mut().enumerate() {
                *cell = f(&self.columns[idx], cell.take());
            }
        }
        self
    }
}

fn json_cell(value: &JsonValue) -> Cell {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
