//! Input ingestion for user import files.
//!
//! This crate resolves CLI paths into named input sources and loads each
//! source into a Polars DataFrame twice: strictly, to detect unparsable
//! files, and leniently, so that schema validation can still run on them.
//!
//! # Example
//!
//! ```ignore
//! use fuiman_ingest::{read_source, resolve_sources};
//!
//! let sources = resolve_sources(&[PathBuf::from("data/")])?;
//! for (name, path) in &sources {
//!     let read = read_source(path);
//!     if let Some(error) = read.read_error() {
//!         eprintln!("{name}: {error}");
//!     }
//! }
//! ```

mod cell;
mod discovery;
mod error;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Source Discovery ===
pub use discovery::{list_csv_files_recursive, resolve_sources};

// === CSV Reading ===
pub use reader::{
    COMMENT_PREFIX, ReadMode, SourceRead, read_csv, read_source, read_source_with_schema,
};

// === Cell Access ===
pub use cell::{
    Cell, CellReader, TIMESTAMP_FORMAT, any_to_cell, decode_column, format_numeric,
    format_timestamp, parse_bool, parse_timestamp,
};
