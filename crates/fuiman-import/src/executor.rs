//! Sequential batch submission with bounded retries.

use std::thread;
use std::time::Duration;

use fuiman_transform::UserRecord;
use tracing::{debug, debug_span, info, info_span, warn};

use crate::error::{GatewayError, ImportError, Result};
use crate::gateway::{Connection, Gateway, ImportRequest, ImportResponse, USER_IMPORT_PATH};
use crate::options::{ImportOptions, TotalRecordsScope};
use crate::outcome::{BatchFailure, ImportOutcome};

/// Records of one input source.
#[derive(Debug, Clone)]
pub struct SourceRecords {
    pub name: String,
    pub records: Vec<UserRecord>,
}

/// Result of a single batch, reported to the observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Submitted { created: u64, updated: u64, failed: u64 },
    Failed { attempts: u32, message: String },
}

/// Progress notification sent after each batch.
#[derive(Debug, Clone)]
pub struct BatchProgress<'a> {
    pub source: &'a str,
    pub index: usize,
    pub records: usize,
    pub status: &'a BatchStatus,
}

type Observer<'o> = Box<dyn Fn(&BatchProgress<'_>) + 'o>;

/// Partitions records into consecutive batches of at most `batch_size`.
///
/// `batch_size` must be at least 1.
pub fn partition(
    records: &[UserRecord],
    batch_size: usize,
) -> impl Iterator<Item = &[UserRecord]> {
    records.chunks(batch_size.max(1))
}

/// Number of batches `records` records split into.
pub fn batch_count(records: usize, batch_size: usize) -> usize {
    records.div_ceil(batch_size.max(1))
}

/// Drives batch submission through a [`Gateway`].
pub struct BatchExecutor<'o> {
    options: ImportOptions,
    observer: Option<Observer<'o>>,
}

impl std::fmt::Debug for BatchExecutor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchExecutor")
            .field("options", &self.options)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl<'o> BatchExecutor<'o> {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            observer: None,
        }
    }

    /// Registers a callback invoked after every batch.
    #[must_use]
    pub fn with_observer(mut self, observer: impl Fn(&BatchProgress<'_>) + 'o) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Submits one record set, reporting `total_records` in every batch.
    pub fn run(
        &self,
        gateway: &dyn Gateway,
        records: &[UserRecord],
        total_records: usize,
    ) -> Result<ImportOutcome> {
        self.options.validate()?;
        let connection = gateway.connect().map_err(ImportError::Connect)?;

        let mut outcome = ImportOutcome::default();
        self.submit_source(connection.as_ref(), "", records, total_records, &mut outcome);
        Ok(outcome)
    }

    /// Submits several sources over a single connection, in the given order.
    pub fn run_sources(
        &self,
        gateway: &dyn Gateway,
        sources: &[SourceRecords],
    ) -> Result<ImportOutcome> {
        self.options.validate()?;
        let run_total: usize = sources.iter().map(|s| s.records.len()).sum();
        let connection = gateway.connect().map_err(ImportError::Connect)?;

        let mut outcome = ImportOutcome::default();
        for source in sources {
            let total = match self.options.total_records_scope {
                TotalRecordsScope::Run => run_total,
                TotalRecordsScope::Source => source.records.len(),
            };
            let span = info_span!("source", name = %source.name);
            let _guard = span.enter();
            self.submit_source(
                connection.as_ref(),
                &source.name,
                &source.records,
                total,
                &mut outcome,
            );
        }

        info!(
            created = outcome.created_records,
            updated = outcome.updated_records,
            failed = outcome.failed_records,
            "Import finished"
        );
        Ok(outcome)
    }

    fn submit_source(
        &self,
        connection: &dyn Connection,
        source: &str,
        records: &[UserRecord],
        total_records: usize,
        outcome: &mut ImportOutcome,
    ) {
        let batches = batch_count(records.len(), self.options.batch_size);
        info!(records = records.len(), batches, total_records, "Submitting records");

        for (index, batch) in partition(records, self.options.batch_size).enumerate() {
            let span = debug_span!("batch", index);
            let _guard = span.enter();

            let request = ImportRequest {
                users: batch,
                total_records,
                deactivate_missing_users: self.options.deactivate_missing_users,
                update_only_present_fields: self.options.update_only_present_fields(),
                source_type: self.options.source_type.as_deref(),
            };

            let status = match self.submit_with_retry(connection, &request) {
                Ok(response) => {
                    let status = BatchStatus::Submitted {
                        created: response.created_records,
                        updated: response.updated_records,
                        failed: response.failed_records,
                    };
                    outcome.record_success(batch.len(), response);
                    status
                }
                Err((attempts, err)) => {
                    warn!(attempts, error = %err, records = batch.len(), "Batch failed");
                    outcome.record_failure(BatchFailure {
                        source: source.to_string(),
                        index,
                        records: batch.len(),
                        attempts,
                        message: err.to_string(),
                    });
                    BatchStatus::Failed {
                        attempts,
                        message: err.to_string(),
                    }
                }
            };

            if let Some(observer) = &self.observer {
                observer(&BatchProgress {
                    source,
                    index,
                    records: batch.len(),
                    status: &status,
                });
            }
        }
    }

    /// Posts a batch, retrying transient failures up to `retry_count` times.
    ///
    /// On failure returns the number of attempts made and the last error.
    fn submit_with_retry(
        &self,
        connection: &dyn Connection,
        request: &ImportRequest<'_>,
    ) -> std::result::Result<ImportResponse, (u32, GatewayError)> {
        let max_retries = self.options.retry_count;
        let mut attempt: u32 = 0;
        loop {
            if attempt > 0 && self.options.retry_backoff_ms > 0 {
                let backoff = self
                    .options
                    .retry_backoff_ms
                    .saturating_mul(2u64.saturating_pow(attempt - 1));
                warn!(attempt, backoff_ms = backoff, "Retrying batch after error");
                thread::sleep(Duration::from_millis(backoff));
            }

            match connection.post_import(request) {
                Ok(response) => {
                    debug!(
                        attempt,
                        path = USER_IMPORT_PATH,
                        created = response.created_records,
                        failed = response.failed_records,
                        "Batch accepted"
                    );
                    return Ok(response);
                }
                Err(err) if err.is_retryable() && attempt < max_retries => {
                    debug!(attempt, error = %err, "Transient failure, will retry");
                    attempt += 1;
                }
                Err(err) => return Err((attempt + 1, err)),
            }
        }
    }
}
