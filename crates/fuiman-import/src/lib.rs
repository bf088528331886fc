//! Batched import of user records into FOLIO.
//!
//! The [`BatchExecutor`] slices transformed records into fixed-size batches
//! and submits them one after another through a [`Gateway`] connection.
//! Transient failures are retried a bounded number of times, permanent
//! rejections never are, and every outcome is folded into an
//! [`ImportOutcome`].
//!
//! # Example
//!
//! ```ignore
//! use fuiman_import::{BatchExecutor, ImportOptions};
//!
//! let executor = BatchExecutor::new(ImportOptions::default().with_batch_size(50));
//! let outcome = executor.run(&gateway, &records, records.len())?;
//! if outcome.threshold_exceeded(10.0) {
//!     eprintln!("too many failed users");
//! }
//! ```

mod error;
mod executor;
mod gateway;
mod options;
mod outcome;

// === Error Types ===
pub use error::{GatewayError, ImportError, Result, is_retryable_status};

// === Gateway ===
pub use gateway::{
    Connection, FailedUser, Gateway, ImportRequest, ImportResponse, USER_IMPORT_PATH,
};

// === Execution ===
pub use executor::{
    BatchExecutor, BatchProgress, BatchStatus, SourceRecords, batch_count, partition,
};
pub use options::{ImportOptions, TotalRecordsScope};
pub use outcome::{BatchFailure, ImportOutcome};
