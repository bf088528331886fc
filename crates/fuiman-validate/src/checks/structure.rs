//! Header checks: required, unknown and deprecated columns.

use fuiman_schema::SchemaDefinition;

use super::super::issue::Issue;
use super::DecodedFrame;

/// Check the header against the closed schema.
pub fn check(schema: &SchemaDefinition, frame: &DecodedFrame) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rule in schema.required_columns() {
        if !frame.header.iter().any(|name| name == rule.name) {
            issues.push(Issue::ColumnMissing {
                column: rule.name.to_string(),
            });
        }
    }

    for name in &frame.header {
        if schema.is_deprecated(name) {
            issues.push(Issue::DeprecatedColumn {
                column: name.clone(),
            });
        } else if schema.column(name).is_none() {
            issues.push(Issue::UnknownColumn {
                column: name.clone(),
            });
        }
    }

    issues
}
