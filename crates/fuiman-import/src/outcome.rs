//! Aggregated import results.

use serde::Serialize;

use crate::gateway::{FailedUser, ImportResponse};

/// A batch that failed as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchFailure {
    pub source: String,
    /// 0-based batch index within the source.
    pub index: usize,
    pub records: usize,
    pub attempts: u32,
    pub message: String,
}

/// Running totals across all batches and sources. Counters only grow.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    /// Records submitted, whatever their result.
    pub total_records: u64,
    pub created_records: u64,
    pub updated_records: u64,
    pub failed_records: u64,
    pub batches_submitted: usize,
    pub batches_failed: usize,
    pub failed_users: Vec<FailedUser>,
    pub batch_failures: Vec<BatchFailure>,
}

impl ImportOutcome {
    pub(crate) fn record_success(&mut self, records: usize, response: ImportResponse) {
        self.total_records += records as u64;
        self.created_records += response.created_records;
        self.updated_records += response.updated_records;
        self.failed_records += response.failed_records;
        self.batches_submitted += 1;
        self.failed_users.extend(response.failed_users);
    }

    pub(crate) fn record_failure(&mut self, failure: BatchFailure) {
        self.total_records += failure.records as u64;
        self.failed_records += failure.records as u64;
        self.batches_submitted += 1;
        self.batches_failed += 1;
        self.batch_failures.push(failure);
    }

    /// Failed records as a percentage of submitted records.
    pub fn failure_percentage(&self) -> f64 {
        if self.total_records == 0 {
            return 0.0;
        }
        self.failed_records as f64 / self.total_records as f64 * 100.0
    }

    /// Whether the failure percentage is above `threshold` (0-100).
    pub fn threshold_exceeded(&self, threshold: f64) -> bool {
        self.failure_percentage() > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(created: u64, failed: u64) -> ImportResponse {
        ImportResponse {
            created_records: created,
            failed_records: failed,
            ..ImportResponse::default()
        }
    }

    #[test]
    fn test_counters_accumulate() {
        let mut outcome = ImportOutcome::default();
        outcome.record_success(2, response(2, 0));
        outcome.record_failure(BatchFailure {
            source: "staff".into(),
            index: 1,
            records: 2,
            attempts: 1,
            message: "rejected".into(),
        });
        assert_eq!(outcome.total_records, 4);
        assert_eq!(outcome.created_records, 2);
        assert_eq!(outcome.failed_records, 2);
        assert_eq!(outcome.batches_failed, 1);
        assert!((outcome.failure_percentage() - 50.0).abs() < f64::EPSILON);
        assert!(outcome.threshold_exceeded(49.0));
        assert!(!outcome.threshold_exceeded(50.0));
    }

    #[test]
    fn test_empty_run_never_exceeds() {
        let outcome = ImportOutcome::default();
        assert!(!outcome.threshold_exceeded(0.0));
    }
}
