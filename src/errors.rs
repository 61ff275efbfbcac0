//! Error types for aqicast.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in aqicast operations.
#[derive(Error, Debug)]
pub enum AqicastError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Backend returned an error status or an error body
    #[error("backend error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Settings file could not be read or written
    #[error("settings error: {0}")]
    Settings(String),
}
