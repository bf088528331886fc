//! Error types for FOLIO configuration.

use thiserror::Error;

/// Errors raised while building a FOLIO client.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Endpoint is not a valid URL.
    #[error("invalid FOLIO endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// A required setting is empty.
    #[error("FOLIO {0} is required")]
    MissingSetting(&'static str),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Result type for FOLIO configuration.
pub type Result<T> = std::result::Result<T, FolioError>;
