//! Per-source validation report.

use serde::Serialize;

use super::category::Category;
use super::issue::Issue;

/// Schema violations found in one source. An empty report means the source
/// conforms.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Issues in one category.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.category() == category)
    }

    /// Issues reported against a column.
    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.column() == column)
    }

    /// Whether a given rule fired on a column.
    pub fn has(&self, column: &str, rule: &str) -> bool {
        self.for_column(column).any(|issue| issue.rule() == rule)
    }
}
