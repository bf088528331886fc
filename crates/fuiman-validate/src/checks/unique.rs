//! Column-wide uniqueness checks.

use std::collections::HashMap;

use fuiman_ingest::Cell;
use fuiman_schema::ColumnRule;

use super::super::issue::{Issue, Violations};

/// Check that non-null values of a unique column do not repeat.
///
/// Every row holding a repeated value is reported, including the first.
pub fn check(rule: &ColumnRule, cells: &[Cell]) -> Option<Issue> {
    if !rule.is_unique() {
        return None;
    }

    let mut occurrences: HashMap<String, usize> = HashMap::new();
    for cell in cells.iter().filter(|cell| !cell.is_null()) {
        *occurrences.entry(cell.render()).or_default() += 1;
    }

    let mut violations = Violations::default();
    for (idx, cell) in cells.iter().enumerate() {
        if cell.is_null() {
            continue;
        }
        let value = cell.render();
        if occurrences.get(&value).copied().unwrap_or(0) > 1 {
            violations.push(idx, value);
        }
    }

    (!violations.is_empty()).then(|| Issue::DuplicateValues {
        column: rule.name.to_string(),
        violations,
    })
}
