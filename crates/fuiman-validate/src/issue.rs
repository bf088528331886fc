//! Validation issue types.
//!
//! Each variant carries only its needed data. Row-level issues carry a total
//! count plus up to [`MAX_SAMPLES`] offending rows.

use serde::Serialize;

use fuiman_schema::ColumnType;

use super::category::Category;

/// Maximum offending rows kept per issue.
pub const MAX_SAMPLES: usize = 5;

/// One offending cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub value: String,
}

/// Offending rows of one rule, with a bounded sample list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Violations {
    pub count: u64,
    pub samples: Vec<Sample>,
}

impl Violations {
    /// Records an offending cell by its 0-based row index.
    pub fn push(&mut self, row_idx: usize, value: impl Into<String>) {
        self.count += 1;
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(Sample {
                row: row_idx + 1,
                value: value.into(),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    fn describe(&self) -> String {
        if self.samples.is_empty() {
            return String::new();
        }
        let shown: Vec<String> = self
            .samples
            .iter()
            .map(|s| {
                if s.value.is_empty() {
                    format!("row {}", s.row)
                } else {
                    format!("row {}: '{}'", s.row, s.value)
                }
            })
            .collect();
        format!(" (e.g., {})", shown.join(", "))
    }
}

/// Schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Issue {
    // Structure checks
    /// Required column is absent from the header.
    ColumnMissing { column: String },
    /// Column is not part of the schema.
    UnknownColumn { column: String },
    /// Column was removed from the import format.
    DeprecatedColumn { column: String },

    // Presence checks
    /// Non-nullable column has empty cells.
    NullValues {
        column: String,
        violations: Violations,
    },

    // Uniqueness checks
    /// Column-wide unique values repeat.
    DuplicateValues {
        column: String,
        violations: Violations,
    },
    /// List items repeat within a cell.
    DuplicateListItems {
        column: String,
        violations: Violations,
    },

    // Type checks
    /// Cell cannot be read as the column's type.
    InvalidType {
        column: String,
        expected: ColumnType,
        violations: Violations,
    },
    /// Structured cell is not a JSON object.
    MalformedStructure {
        column: String,
        violations: Violations,
    },

    // Format checks
    /// Cell does not match a format predicate (uuid, email, url).
    InvalidFormat {
        column: String,
        format: &'static str,
        violations: Violations,
    },
    /// Cell or list item is outside the allowed set.
    ValueNotAllowed {
        column: String,
        allowed: &'static [&'static str],
        violations: Violations,
    },

    // Group checks
    /// A group column is filled but an anchor is absent.
    GroupIncomplete {
        group: &'static str,
        column: String,
        violations: Violations,
    },
}

impl Issue {
    /// Column the issue is reported against.
    pub fn column(&self) -> &str {
        match self {
            Issue::ColumnMissing { column }
            | Issue::UnknownColumn { column }
            | Issue::DeprecatedColumn { column }
            | Issue::NullValues { column, .. }
            | Issue::DuplicateValues { column, .. }
            | Issue::DuplicateListItems { column, .. }
            | Issue::InvalidType { column, .. }
            | Issue::MalformedStructure { column, .. }
            | Issue::InvalidFormat { column, .. }
            | Issue::ValueNotAllowed { column, .. }
            | Issue::GroupIncomplete { column, .. } => column,
        }
    }

    /// Name of the violated rule.
    pub fn rule(&self) -> &'static str {
        match self {
            Issue::ColumnMissing { .. } => "required",
            Issue::UnknownColumn { .. } => "closed_schema",
            Issue::DeprecatedColumn { .. } => "deprecated",
            Issue::NullValues { .. } => "not_nullable",
            Issue::DuplicateValues { .. } => "unique",
            Issue::DuplicateListItems { .. } => "unique_items",
            Issue::InvalidType { .. } => "dtype",
            Issue::MalformedStructure { .. } => "json_object",
            Issue::InvalidFormat { format, .. } => *format,
            Issue::ValueNotAllowed { .. } => "isin",
            Issue::GroupIncomplete { .. } => "conditional_group",
        }
    }

    /// Row-level details, if the issue is not header-level.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Issue::ColumnMissing { .. }
            | Issue::UnknownColumn { .. }
            | Issue::DeprecatedColumn { .. } => None,
            Issue::NullValues { violations, .. }
            | Issue::DuplicateValues { violations, .. }
            | Issue::DuplicateListItems { violations, .. }
            | Issue::InvalidType { violations, .. }
            | Issue::MalformedStructure { violations, .. }
            | Issue::InvalidFormat { violations, .. }
            | Issue::ValueNotAllowed { violations, .. }
            | Issue::GroupIncomplete { violations, .. } => Some(violations),
        }
    }

    /// Count of offending rows (if applicable).
    pub fn count(&self) -> Option<u64> {
        self.violations().map(|v| v.count)
    }

    /// Category for this issue type.
    pub fn category(&self) -> Category {
        match self {
            Issue::ColumnMissing { .. }
            | Issue::UnknownColumn { .. }
            | Issue::DeprecatedColumn { .. } => Category::Structure,
            Issue::NullValues { .. } => Category::Presence,
            Issue::DuplicateValues { .. } | Issue::DuplicateListItems { .. } => {
                Category::Uniqueness
            }
            Issue::InvalidType { .. } | Issue::MalformedStructure { .. } => Category::Type,
            Issue::InvalidFormat { .. } => Category::Format,
            Issue::ValueNotAllowed { .. } => Category::Terminology,
            Issue::GroupIncomplete { .. } => Category::Group,
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            Issue::ColumnMissing { column } => {
                format!("Required column {} is missing", column)
            }
            Issue::UnknownColumn { column } => {
                format!("Column {} is not part of the user import schema", column)
            }
            Issue::DeprecatedColumn { column } => {
                format!("Column {} is deprecated", column)
            }
            Issue::NullValues { column, violations } => format!(
                "Column {} has {} empty values{}",
                column,
                violations.count,
                violations.describe()
            ),
            Issue::DuplicateValues { column, violations } => format!(
                "Column {} has {} duplicated values{}",
                column,
                violations.count,
                violations.describe()
            ),
            Issue::DuplicateListItems { column, violations } => format!(
                "Column {} has {} lists with repeated items{}",
                column,
                violations.count,
                violations.describe()
            ),
            Issue::InvalidType {
                column,
                expected,
                violations,
            } => format!(
                "Column {} has {} values that are not {}{}",
                column,
                violations.count,
                expected,
                violations.describe()
            ),
            Issue::MalformedStructure { column, violations } => format!(
                "Column {} has {} values that are not JSON objects{}",
                column,
                violations.count,
                violations.describe()
            ),
            Issue::InvalidFormat {
                column,
                format,
                violations,
            } => format!(
                "Column {} has {} values with invalid {} format{}",
                column,
                violations.count,
                format,
                violations.describe()
            ),
            Issue::ValueNotAllowed {
                column,
                allowed,
                violations,
            } => format!(
                "Column {} has {} values not in [{}]{}",
                column,
                violations.count,
                allowed.join(", "),
                violations.describe()
            ),
            Issue::GroupIncomplete {
                group,
                column,
                violations,
            } => format!(
                "Column {} is required when any {} field is set; {} rows lack it{}",
                column,
                group,
                violations.count,
                violations.describe()
            ),
        }
    }
}
