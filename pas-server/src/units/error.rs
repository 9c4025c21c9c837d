//! Unit API error types.

/// Errors that can occur when talking to the unit API.
#[derive(Debug, thiserror::Error)]
pub enum UnitApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The requested unit does not exist
    #[error("unit {0} not found")]
    NotFound(i64),

    /// Client could not be configured
    #[error("not configured: {0}")]
    NotConfigured(String),
}
