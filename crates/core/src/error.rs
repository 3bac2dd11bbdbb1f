//! Table error model.

use thiserror::Error;

/// Result type used by table construction.
pub type TableResult<T> = Result<T, TableError>;

/// Table-level error.
///
/// Keep this focused on upstream contract violations (a payload that is not a
/// table). Ordinary data sparsity (blank cells, unparseable values) is never an
/// error; it is absorbed by the analysis layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A row was not a mapping of column name to value.
    #[error("malformed row {index}: expected a mapping of column name to value, found {found}")]
    MalformedRow { index: usize, found: String },

    /// A dense row did not line up with the declared columns.
    #[error("row {index} has {found} cells but the table declares {expected} columns")]
    RowWidth {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// The same column name was declared twice.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// The payload as a whole was not a table (e.g. not an array of rows).
    #[error("invalid table payload: {0}")]
    InvalidPayload(String),
}

impl TableError {
    pub fn malformed_row(index: usize, found: impl Into<String>) -> Self {
        Self::MalformedRow {
            index,
            found: found.into(),
        }
    }

    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }
}
