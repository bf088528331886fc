//! Conditional group checks.
//!
//! One engine evaluates every [`ConditionalGroup`] of the schema: when any
//! column under a group's prefix is non-null in a row, each anchor column
//! must be present and non-null in that row. A null cell counts as absent.

use fuiman_schema::{ConditionalGroup, SchemaDefinition};

use super::super::issue::{Issue, Violations};
use super::DecodedFrame;

/// Check all conditional groups of the schema.
pub fn check(schema: &SchemaDefinition, frame: &DecodedFrame) -> Vec<Issue> {
    schema
        .groups
        .iter()
        .flat_map(|group| check_group(group, frame))
        .collect()
}

fn check_group(group: &ConditionalGroup, frame: &DecodedFrame) -> Vec<Issue> {
    let members: Vec<&str> = frame
        .header
        .iter()
        .filter(|name| group.contains(name))
        .map(String::as_str)
        .collect();
    if members.is_empty() {
        return Vec::new();
    }

    let active_rows: Vec<usize> = (0..frame.height)
        .filter(|&row| {
            members.iter().any(|name| {
                frame
                    .column(name)
                    .and_then(|cells| cells.get(row))
                    .is_some_and(|cell| !cell.is_null())
            })
        })
        .collect();

    let mut issues = Vec::new();
    for anchor in group.anchor_columns() {
        let cells = frame.column(&anchor);
        let mut violations = Violations::default();
        for &row in &active_rows {
            let present = cells
                .and_then(|cells| cells.get(row))
                .is_some_and(|cell| !cell.is_null());
            if !present {
                violations.push(row, "");
            }
        }
        if !violations.is_empty() {
            issues.push(Issue::GroupIncomplete {
                group: group.prefix,
                column: anchor,
                violations,
            });
        }
    }
    issues
}
