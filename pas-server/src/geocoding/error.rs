//! Geocoding provider error types.

/// Errors that can occur when querying the geocoding provider.
///
/// These never leave the geocoding module: the caching layer logs them
/// and records the postal code as unresolvable.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status
    #[error("provider error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Result had coordinates that are not numbers
    #[error("invalid coordinate {field}: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },

    /// Client could not be configured
    #[error("not configured: {0}")]
    NotConfigured(String),
}
