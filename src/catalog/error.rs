use thiserror::Error;

/// Failures talking to the music catalog backend.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backend could not be reached or returned an HTTP error status.
    #[error("catalog unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered but `resultCode` was not 200.
    #[error("catalog rejected request ({code}): {message}")]
    Rejected { code: i64, message: String },

    /// The response body was not the expected JSON envelope.
    #[error("unexpected catalog response: {0}")]
    Decode(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The request was refused locally before being sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
