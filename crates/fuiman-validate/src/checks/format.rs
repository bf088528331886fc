//! Format checks: uuid, email, url, enumerations, lists and structured cells.

use std::collections::HashSet;
use std::sync::LazyLock;

use fuiman_ingest::Cell;
use fuiman_schema::{ColumnRule, ColumnType, FormatRule};
use regex::Regex;

use super::super::issue::{Issue, Violations};

static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[1-5][0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$",
    )
    .expect("uuid pattern compiles")
});

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

pub fn is_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Absolute `http`/`https` URL with a host.
pub fn is_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// JSON text whose top-level value is an object.
pub fn is_json_object(value: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(value).is_ok_and(|v| v.is_object())
}

/// Check cell formats for a column.
pub fn check(rule: &ColumnRule, cells: &[Cell], delimiter: char) -> Vec<Issue> {
    match rule.column_type {
        ColumnType::List => check_list(rule, cells, delimiter),
        ColumnType::Structured => check_structured(rule, cells).into_iter().collect(),
        _ => check_scalar(rule, cells).into_iter().collect(),
    }
}

fn check_scalar(rule: &ColumnRule, cells: &[Cell]) -> Option<Issue> {
    let format = rule.format?;
    let mut violations = Violations::default();

    for (idx, cell) in cells.iter().enumerate() {
        if cell.is_null() {
            continue;
        }
        let value = cell.render();
        if !matches_format(format, &value) {
            violations.push(idx, value);
        }
    }

    if violations.is_empty() {
        return None;
    }
    Some(format_issue(rule, format, violations))
}

fn check_list(rule: &ColumnRule, cells: &[Cell], delimiter: char) -> Vec<Issue> {
    let mut repeated = Violations::default();
    let mut invalid = Violations::default();

    for (idx, cell) in cells.iter().enumerate() {
        let items = cell.list_items(delimiter);

        if rule.unique_items {
            let mut seen = HashSet::new();
            if !items.iter().all(|item| seen.insert(item.as_str())) {
                repeated.push(idx, cell.render());
            }
        }

        if let Some(format) = rule.format {
            for item in items.iter().filter(|item| !matches_format(format, item)) {
                invalid.push(idx, item.clone());
            }
        }
    }

    let mut issues = Vec::new();
    if !repeated.is_empty() {
        issues.push(Issue::DuplicateListItems {
            column: rule.name.to_string(),
            violations: repeated,
        });
    }
    if let Some(format) = rule.format
        && !invalid.is_empty()
    {
        issues.push(format_issue(rule, format, invalid));
    }
    issues
}

fn check_structured(rule: &ColumnRule, cells: &[Cell]) -> Option<Issue> {
    let mut violations = Violations::default();
    for (idx, cell) in cells.iter().enumerate() {
        match cell {
            Cell::Null => {}
            Cell::Text(text) if is_json_object(text) => {}
            other => violations.push(idx, other.render()),
        }
    }

    (!violations.is_empty()).then(|| Issue::MalformedStructure {
        column: rule.name.to_string(),
        violations,
    })
}

fn matches_format(format: FormatRule, value: &str) -> bool {
    match format {
        FormatRule::Uuid => is_uuid(value),
        FormatRule::Email => is_email(value),
        FormatRule::Url => is_url(value),
        FormatRule::OneOf(allowed) => allowed.contains(&value),
    }
}

fn format_issue(rule: &ColumnRule, format: FormatRule, violations: Violations) -> Issue {
    match format {
        FormatRule::OneOf(allowed) => Issue::ValueNotAllowed {
            column: rule.name.to_string(),
            allowed,
            violations,
        },
        other => Issue::InvalidFormat {
            column: rule.name.to_string(),
            format: other.name(),
            violations,
        },
    }
}
