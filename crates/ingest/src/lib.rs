//! `boardlens-ingest`: board documents to record tables.
//!
//! Pure transformations only: callers fetch the documents.

pub mod board;
pub mod clean;
pub mod error;

pub use board::{
    Board, BoardData, BoardItem, BoardResponse, ColumnValue, ITEM_NAME_COLUMN, ItemsPage,
    board_to_table, normalize_column_id, parse_board_json,
};
pub use clean::{CleanOptions, clean_table};
pub use error::BoardError;
