use thiserror::Error;

/// Errors that can occur while preparing inventory data or running the
/// growth and yield models.
#[derive(Error, Debug)]
pub enum StandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient input: {0}")]
    InsufficientInput(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Domain error: {0}")]
    Domain(String),
}
