use fuiman_cli::pipeline::SourceCheck;
use fuiman_import::ImportOutcome;

/// Result of the `check` command.
#[derive(Debug)]
pub struct CheckResult {
    /// Reason the FOLIO login failed, if it did.
    pub folio_error: Option<String>,
    pub sources: Vec<SourceCheck>,
}

impl CheckResult {
    pub fn folio_ok(&self) -> bool {
        self.folio_error.is_none()
    }

    pub fn is_ok(&self) -> bool {
        self.folio_ok() && self.sources.iter().all(SourceCheck::is_ok)
    }
}

/// Result of the `import` command.
#[derive(Debug)]
pub enum ImportRun {
    /// At least one source failed its check; nothing was submitted.
    Blocked(CheckResult),
    Completed(ImportSummary),
}

#[derive(Debug)]
pub struct ImportSummary {
    /// Source name and number of records submitted from it.
    pub sources: Vec<(String, usize)>,
    pub outcome: ImportOutcome,
    pub threshold: f64,
}

impl ImportSummary {
    pub fn threshold_exceeded(&self) -> bool {
        self.outcome.threshold_exceeded(self.threshold)
    }
}
