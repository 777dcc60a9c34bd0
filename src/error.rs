use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No API URL configured")]
    NoApiUrl,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{operation} is not available in {mode} mode")]
    Unsupported {
        operation: &'static str,
        mode: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ListingError>;
