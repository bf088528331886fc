//! Import options.

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};

/// What `totalRecords` reports in each batch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalRecordsScope {
    /// Records across all sources of the run.
    #[default]
    Run,
    /// Records of the source the batch belongs to.
    Source,
}

impl TotalRecordsScope {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Source => "source",
        }
    }
}

/// Options controlling how records are submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOptions {
    pub batch_size: usize,
    /// Accepted for compatibility. Batches are always submitted sequentially.
    pub max_concurrency: usize,
    /// Additional attempts after a transient failure.
    pub retry_count: u32,
    /// Initial delay between attempts in milliseconds, doubled per attempt.
    pub retry_backoff_ms: u64,
    /// Percentage (0-100) of failed records above which the run is reported
    /// as failed.
    pub failed_user_threshold: f64,
    pub deactivate_missing_users: bool,
    pub update_all_fields: bool,
    pub source_type: Option<String>,
    pub total_records_scope: TotalRecordsScope,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_concurrency: 1,
            retry_count: 1,
            retry_backoff_ms: 0,
            failed_user_threshold: 50.0,
            deactivate_missing_users: false,
            update_all_fields: false,
            source_type: None,
            total_records_scope: TotalRecordsScope::Run,
        }
    }
}

impl ImportOptions {
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    #[must_use]
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    #[must_use]
    pub fn with_retry_backoff_ms(mut self, retry_backoff_ms: u64) -> Self {
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    #[must_use]
    pub fn with_failed_user_threshold(mut self, threshold: f64) -> Self {
        self.failed_user_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_deactivate_missing_users(mut self, deactivate: bool) -> Self {
        self.deactivate_missing_users = deactivate;
        self
    }

    #[must_use]
    pub fn with_update_all_fields(mut self, update_all: bool) -> Self {
        self.update_all_fields = update_all;
        self
    }

    #[must_use]
    pub fn with_source_type(mut self, source_type: Option<String>) -> Self {
        self.source_type = source_type.filter(|s| !s.is_empty());
        self
    }

    #[must_use]
    pub fn with_total_records_scope(mut self, scope: TotalRecordsScope) -> Self {
        self.total_records_scope = scope;
        self
    }

    /// `updateOnlyPresentFields` sent with every batch.
    pub fn update_only_present_fields(&self) -> bool {
        !self.update_all_fields
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ImportError::InvalidOptions(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(ImportError::InvalidOptions(
                "max concurrency must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.failed_user_threshold) {
            return Err(ImportError::InvalidOptions(format!(
                "failed user threshold must be between 0 and 100, got {}",
                self.failed_user_threshold
            )));
        }
        Ok(())
    }
}
