//! Board API document -> [`RecordTable`].
//!
//! Expected shape:
//! `{"data": {"boards": [{"items_page": {"items": [{"name", "column_values": [{"id", "text"}]}]}}]}}`.
//! Only the first board is read; fetching and pagination belong to the caller.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

use boardlens_core::RecordTable;

use crate::error::BoardError;

/// Column holding each item's display name.
pub const ITEM_NAME_COLUMN: &str = "item_name";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardResponse {
    #[serde(default)]
    pub data: Option<BoardData>,
    #[serde(default)]
    pub errors: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardData {
    #[serde(default)]
    pub boards: Vec<Board>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub items_page: ItemsPage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub items: Vec<BoardItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnValue {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Column ids become headers: trimmed, lower-cased, spaces as underscores.
pub fn normalize_column_id(id: &str) -> String {
    id.trim().to_lowercase().replace(' ', "_")
}

/// Flatten the first board's items into a table, one row per item.
pub fn board_to_table(response: &BoardResponse) -> Result<RecordTable, BoardError> {
    if let Some(errors) = &response.errors {
        return Err(BoardError::Api(errors.to_string()));
    }

    let data = response
        .data
        .as_ref()
        .ok_or_else(|| BoardError::UnexpectedShape("missing `data`".to_string()))?;
    let board = data
        .boards
        .first()
        .ok_or_else(|| BoardError::UnexpectedShape("no boards in response".to_string()))?;

    let items = &board.items_page.items;
    let table = RecordTable::from_records(items.iter().map(|item| {
        std::iter::once((ITEM_NAME_COLUMN.to_string(), item.name.clone())).chain(
            item.column_values
                .iter()
                .map(|cv| (normalize_column_id(&cv.id), cv.text.clone())),
        )
    }));

    debug!(
        items = items.len(),
        columns = table.width(),
        "flattened board response"
    );
    Ok(table)
}

/// Parse and flatten a raw board API document.
pub fn parse_board_json(raw: &str) -> Result<RecordTable, BoardError> {
    let response: BoardResponse = serde_json::from_str(raw)?;
    board_to_table(&response)
}
