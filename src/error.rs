use thiserror::Error;

/// Failure modes of the report loader. Expected divergence between two
/// coverage runs is never an error; it is represented as diff elements.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed report: {0}")]
    Malformed(String),

    #[error("Invalid filter pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;
