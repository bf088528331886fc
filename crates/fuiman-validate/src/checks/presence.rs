//! Non-nullable column checks.

use fuiman_ingest::Cell;
use fuiman_schema::ColumnRule;

use super::super::issue::{Issue, Violations};

/// Check that a non-nullable column has no empty cells.
pub fn check(rule: &ColumnRule, cells: &[Cell]) -> Option<Issue> {
    if rule.nullable {
        return None;
    }

    let mut violations = Violations::default();
    for (idx, cell) in cells.iter().enumerate() {
        if cell.is_null() {
            violations.push(idx, "");
        }
    }

    (!violations.is_empty()).then(|| Issue::NullValues {
        column: rule.name.to_string(),
        violations,
    })
}
