//! `boardlens-core`: record table building blocks.
//!
//! This crate contains **pure** table primitives (no IO, no analysis).

pub mod cell;
pub mod error;
pub mod table;

pub use cell::{UNKNOWN_LABEL, is_blank, label_or_unknown, normalize_label, parse_amount, parse_datetime};
pub use error::{TableError, TableResult};
pub use table::{Cell, RecordTable, Row};
