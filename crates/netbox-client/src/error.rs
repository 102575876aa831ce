//! NetBox client errors

use thiserror::Error;

/// Errors that can occur when interacting with the NetBox API
#[derive(Debug, Error)]
pub enum NetBoxError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NetBox API returned an error
    #[error("NetBox API error: {0}")]
    Api(String),

    /// NetBox answered with a 5xx status
    #[error("NetBox server error: {0}")]
    Server(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (e.g., missing required fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl NetBoxError {
    /// Whether repeating the same request may succeed
    ///
    /// Transport failures and 5xx answers are transient; everything else
    /// reflects the request or the data and fails the same way again.
    pub fn is_transient(&self) -> bool {
        match self {
            NetBoxError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            NetBoxError::Server(_) => true,
            _ => false,
        }
    }
}
