//! Error types for record transformation.

use thiserror::Error;

/// Errors that can occur while transforming a frame.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A column could not be decoded.
    #[error(transparent)]
    Ingest(#[from] fuiman_ingest::IngestError),
}

/// Result type for transformation.
pub type Result<T> = std::result::Result<T, TransformError>;
