//! Check and preparation stages shared by the `check` and `import` commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use fuiman_import::SourceRecords;
use fuiman_ingest::{SourceRead, read_source};
use fuiman_transform::transform;
use fuiman_validate::{ValidationReport, validate};

/// Read and schema status of one input source.
#[derive(Debug)]
pub struct SourceCheck {
    pub name: String,
    pub path: PathBuf,
    pub read: SourceRead,
    /// `None` when neither read pass produced a frame.
    pub report: Option<ValidationReport>,
}

impl SourceCheck {
    /// The file parsed without the lenient fallback.
    pub fn read_ok(&self) -> bool {
        self.read.strict.is_ok()
    }

    pub fn schema_ok(&self) -> bool {
        self.report.as_ref().is_some_and(ValidationReport::is_empty)
    }

    pub fn is_ok(&self) -> bool {
        self.read_ok() && self.schema_ok()
    }

    pub fn read_error(&self) -> Option<String> {
        self.read.read_error()
    }

    /// Rows of the frame that was validated.
    pub fn rows(&self) -> Option<usize> {
        self.read.frame().map(DataFrame::height)
    }
}

/// Reads and validates one source.
pub fn check_source(name: &str, path: &Path) -> SourceCheck {
    let span = info_span!("source", name = %name);
    let _guard = span.enter();

    let read = read_source(path);
    let report = read.frame().map(validate);

    match (&read.strict, &report) {
        (Err(err), _) => warn!(error = %err, "Source could not be read"),
        (Ok(_), Some(report)) if !report.is_empty() => {
            warn!(issues = report.len(), "Source violates the user import schema");
        }
        _ => info!("Source is valid"),
    }

    SourceCheck {
        name: name.to_string(),
        path: path.to_path_buf(),
        read,
        report,
    }
}

/// Checks every source, in name order.
pub fn check_sources(sources: &BTreeMap<String, PathBuf>) -> Vec<SourceCheck> {
    sources
        .iter()
        .map(|(name, path)| check_source(name, path))
        .collect()
}

/// Transforms checked sources into records ready for submission.
///
/// Fails without transforming anything when any source failed its check.
pub fn prepare_import(checks: &[SourceCheck]) -> Result<Vec<SourceRecords>> {
    let failed: Vec<&str> = checks
        .iter()
        .filter(|check| !check.is_ok())
        .map(|check| check.name.as_str())
        .collect();
    if !failed.is_empty() {
        bail!(
            "{} of {} sources failed validation: {}",
            failed.len(),
            checks.len(),
            failed.join(", ")
        );
    }

    checks
        .iter()
        .map(|check| {
            let frame = check
                .read
                .frame()
                .with_context(|| format!("no data read from {}", check.name))?;
            let records =
                transform(frame).with_context(|| format!("transform source {}", check.name))?;
            info!(source = %check.name, records = records.len(), "Prepared records");
            Ok(SourceRecords {
                name: check.name.clone(),
                records,
            })
        })
        .collect()
}
