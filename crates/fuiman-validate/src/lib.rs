//! Schema validation for user import files.
//!
//! Validation is collecting: every check runs and all violations are
//! reported together.
//!
//! - **Structure**: required columns, closed schema, deprecated columns
//! - **Presence**: non-nullable columns
//! - **Uniqueness**: column-wide unique values and unique list items
//! - **Type**: boolean, date-time and structured conformance
//! - **Format**: uuid, email, url and enumerated values
//! - **Conditional groups**: anchor fields required once a group is used
//!
//! # Example
//!
//! ```ignore
//! use fuiman_validate::validate;
//!
//! let report = validate(&df);
//! for issue in &report.issues {
//!     println!("[{}] {}: {}", issue.category(), issue.column(), issue.message());
//! }
//! ```

mod category;
mod checks;
mod issue;
mod report;

use fuiman_schema::{SchemaDefinition, USER_IMPORT_SCHEMA};
use polars::prelude::DataFrame;

pub use category::Category;
pub use checks::format::{is_email, is_json_object, is_url, is_uuid};
pub use issue::{Issue, MAX_SAMPLES, Sample, Violations};
pub use report::ValidationReport;

/// Validate a frame against the user import schema.
pub fn validate(df: &DataFrame) -> ValidationReport {
    validate_with_schema(&USER_IMPORT_SCHEMA, df)
}

/// Validate a frame against an arbitrary schema.
pub fn validate_with_schema(schema: &SchemaDefinition, df: &DataFrame) -> ValidationReport {
    let report = ValidationReport::new(checks::run_all(schema, df));
    tracing::debug!(issues = report.len(), "Validation complete");
    report
}
