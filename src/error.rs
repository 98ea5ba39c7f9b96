use thiserror::Error;

/// Main error type for wikidata-cli
#[derive(Error, Debug)]
pub enum WikidataError {
    /// Rejected before any request was issued
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a response (connect, timeout, TLS, ...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The remote service answered with an HTTP error status
    #[error("{}", remote_message(.status, .body))]
    Remote { status: u16, body: String },

    /// The response body was not the JSON shape we expected
    #[error("failed to decode response json: {0}")]
    Decode(#[from] serde_json::Error),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn remote_message(status: &u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("remote service returned HTTP {}", status)
    } else {
        format!("remote service returned HTTP {}: {}", status, body)
    }
}

impl WikidataError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        WikidataError::InvalidInput(message.into())
    }

    /// HTTP status of a remote failure, if this is one.
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            WikidataError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenient Result type using WikidataError
pub type Result<T> = std::result::Result<T, WikidataError>;
