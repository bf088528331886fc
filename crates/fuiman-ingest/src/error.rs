//! Error types for input discovery and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving or reading input sources.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Configuration Errors ===
    /// Path is neither a file nor a directory.
    #[error("input path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// No CSV files were found under the given paths.
    #[error("no CSV files found in {}", display_paths(.paths))]
    NoSources { paths: Vec<PathBuf> },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Polars could not parse the file.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Column not found in DataFrame.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    /// Configuration errors are fatal before any source is processed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound { .. } | Self::NoSources { .. } | Self::DirectoryRead { .. }
        )
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
