//! Type conformance checks.

use fuiman_ingest::Cell;
use fuiman_schema::{ColumnRule, ColumnType};

use super::super::issue::{Issue, Violations};

/// Check that every non-null cell can be read as the column's type.
///
/// Strings and lists accept any scalar. Structured columns are checked by
/// the format checks.
pub fn check(rule: &ColumnRule, cells: &[Cell]) -> Option<Issue> {
    let accepts: fn(&Cell) -> bool = match rule.column_type {
        ColumnType::Boolean => |cell: &Cell| cell.as_bool().is_some(),
        ColumnType::DateTime => |cell: &Cell| cell.as_timestamp().is_some(),
        ColumnType::String | ColumnType::List | ColumnType::Structured => return None,
    };

    let mut violations = Violations::default();
    for (idx, cell) in cells.iter().enumerate() {
        if !cell.is_null() && !accepts(cell) {
            violations.push(idx, cell.render());
        }
    }

    (!violations.is_empty()).then(|| Issue::InvalidType {
        column: rule.name.to_string(),
        expected: rule.column_type,
        violations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuiman_ingest::parse_timestamp;

    #[test]
    fn test_boolean_accepts_text_and_native() {
        let rule = ColumnRule::boolean("active");
        let cells = vec![
            Cell::Boolean(true),
            Cell::Text("false".into()),
            Cell::Null,
            Cell::Text("yes".into()),
            Cell::Number("1".into()),
        ];
        let issue = check(&rule, &cells).unwrap();
        let violations = issue.violations().unwrap();
        assert_eq!(violations.count, 2);
        assert_eq!(violations.samples[0].row, 4);
        assert_eq!(violations.samples[0].value, "yes");
    }

    #[test]
    fn test_datetime_accepts_temporal_and_iso_text() {
        let rule = ColumnRule::datetime("expirationDate");
        let cells = vec![
            Cell::Timestamp(parse_timestamp("2025-01-01").unwrap()),
            Cell::Text("2025-06-30T10:00:00Z".into()),
            Cell::Text("next year".into()),
        ];
        let issue = check(&rule, &cells).unwrap();
        assert_eq!(issue.count(), Some(1));
    }

    #[test]
    fn test_string_accepts_anything() {
        let rule = ColumnRule::string("barcode");
        let cells = vec![Cell::Number("12".into()), Cell::Boolean(true)];
        assert!(check(&rule, &cells).is_none());
    }
}
