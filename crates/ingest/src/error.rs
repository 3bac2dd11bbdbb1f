use thiserror::Error;

/// Failure to turn a board API document into a table.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The API answered with an `errors` member instead of data.
    #[error("board API returned errors: {0}")]
    Api(String),

    #[error("unexpected board response shape: {0}")]
    UnexpectedShape(String),

    #[error("invalid board JSON: {0}")]
    Json(#[from] serde_json::Error),
}
