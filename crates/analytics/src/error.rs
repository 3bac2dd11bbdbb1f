use thiserror::Error;

use boardlens_core::TableError;

/// Result type used by the analysis engine.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Failure of an analysis run.
///
/// Sparse or malformed *cells* never end up here; the engine degrades those to
/// zero amounts, missing dates or empty aggregates. Only contract violations
/// by the caller surface as errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("time window unavailable: {0}")]
    TimeWindow(String),

    #[error("invalid analysis input: {0}")]
    InvalidInput(String),
}
