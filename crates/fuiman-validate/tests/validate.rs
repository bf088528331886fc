//! Schema validation of whole frames.

use fuiman_ingest::read_source;
use fuiman_validate::{Category, Issue, validate};
use polars::prelude::{Column, DataFrame};
use std::io::Write;
use tempfile::NamedTempFile;

fn frame(columns: Vec<(&str, Vec<Option<&str>>)>) -> DataFrame {
    let cols: Vec<Column> = columns
        .into_iter()
        .map(|(name, values)| Column::new(name.into(), values))
        .collect();
    DataFrame::new(cols).unwrap()
}

fn identity(rows: usize) -> Vec<(&'static str, Vec<Option<&'static str>>)> {
    let names = ["u1", "u2", "u3", "u4"];
    let ids = ["e1", "e2", "e3", "e4"];
    vec![
        ("username", names[..rows].iter().map(|s| Some(*s)).collect()),
        ("externalSystemId", ids[..rows].iter().map(|s| Some(*s)).collect()),
    ]
}

fn read_csv(content: &str) -> DataFrame {
    let mut file = NamedTempFile::with_suffix(".csv").unwrap();
    write!(file, "{}", content).unwrap();
    let read = read_source(file.path());
    read.frame().unwrap().clone()
}

#[test]
fn test_clean_frame_has_no_issues() {
    let mut columns = identity(2);
    columns.push(("type", vec![Some("Patron"), Some("Staff")]));
    columns.push(("personal_lastName", vec![Some("Doe"), None]));
    let report = validate(&frame(columns));
    assert!(report.is_empty(), "{:?}", report.issues);
}

#[test]
fn test_missing_required_column() {
    let df = frame(vec![("username", vec![Some("u1")])]);
    let report = validate(&df);
    assert_eq!(
        report.issues,
        vec![Issue::ColumnMissing {
            column: "externalSystemId".to_string()
        }]
    );
    assert_eq!(report.issues[0].category(), Category::Structure);
}

#[test]
fn test_required_nulls_and_duplicates() {
    let df = frame(vec![
        ("username", vec![Some("u1"), Some("u1"), Some("u3")]),
        ("externalSystemId", vec![Some("e1"), None, Some("e3")]),
    ]);
    let report = validate(&df);
    assert!(report.has("username", "unique"));
    assert!(report.has("externalSystemId", "not_nullable"));
    assert_eq!(report.len(), 2);
}

#[test]
fn test_unknown_and_deprecated_columns() {
    let mut columns = identity(1);
    columns.push(("proxyFor", vec![Some("x")]));
    columns.push(("favouriteColour", vec![Some("blue")]));
    let report = validate(&frame(columns));
    assert!(report.has("proxyFor", "deprecated"));
    assert!(report.has("favouriteColour", "closed_schema"));
}

#[test]
fn test_request_preference_anchors() {
    let mut columns = identity(2);
    columns.push(("requestPreference_holdShelf", vec![Some("true"), None]));
    columns.push(("requestPreference_defaultServicePointId", vec![None, Some("sp-1")]));
    let report = validate(&frame(columns));

    // Row 1 has holdShelf but no delivery column; row 2 has neither anchor.
    let delivery: Vec<&Issue> = report.for_column("requestPreference_delivery").collect();
    assert_eq!(delivery.len(), 1);
    assert_eq!(delivery[0].count(), Some(2));

    let hold_shelf: Vec<&Issue> = report.for_column("requestPreference_holdShelf").collect();
    assert_eq!(hold_shelf.len(), 1);
    assert_eq!(hold_shelf[0].violations().unwrap().samples[0].row, 2);
}

#[test]
fn test_fully_empty_group_needs_no_anchors() {
    let mut columns = identity(1);
    columns.push(("requestPreference_defaultServicePointId", vec![None]));
    columns.push(("personal_address_primary_city", vec![None]));
    let report = validate(&frame(columns));
    assert!(report.is_empty(), "{:?}", report.issues);
}

#[test]
fn test_address_requires_type_and_personal_last_name() {
    let mut columns = identity(1);
    columns.push(("personal_address_secondary_city", vec![Some("Leeds")]));
    let report = validate(&frame(columns));
    assert!(report.has("personal_address_secondary_addressTypeId", "conditional_group"));
    assert!(report.has("personal_lastName", "conditional_group"));
    assert!(
        report
            .in_category(Category::Group)
            .all(|issue| issue.count() == Some(1))
    );
}

#[test]
fn test_formats_from_csv() {
    let df = read_csv(
        "username,externalSystemId,id,personal_lastName,personal_email,active,enrollmentDate\n\
         u1,e1,0a1b2c3d-4e5f-4a6b-8c7d-0123456789ab,Doe,doe@example.org,true,2024-01-15\n\
         u2,e2,not-a-uuid,Roe,roe-at-example,maybe,2024-02-01\n",
    );
    let report = validate(&df);
    assert!(report.has("id", "uuid"));
    assert!(report.has("personal_email", "email"));
    assert!(report.has("active", "dtype"));
    assert!(!report.has("enrollmentDate", "dtype"));
    for issue in &report.issues {
        assert_eq!(issue.count(), Some(1), "{}", issue.message());
    }
}

#[test]
fn test_numeric_looking_identifiers_stay_distinct() {
    let df = read_csv(
        "username,externalSystemId,barcode,personal_lastName,\
         personal_address_primary_postalCode,personal_address_primary_addressTypeId\n\
         007,0001,00123,Doe,01002,home\n\
         7,1,123,Roe,01003,home\n",
    );
    let report = validate(&df);
    assert!(report.is_empty(), "{:?}", report.issues);
}

#[test]
fn test_numeric_looking_duplicates_are_reported() {
    let df = read_csv("username,externalSystemId,barcode\n007,0001,00123\n007,0002,00123\n");
    let report = validate(&df);
    assert!(report.has("username", "unique"));
    assert!(report.has("barcode", "unique"));
    assert!(!report.has("externalSystemId", "unique"));
    assert_eq!(report.len(), 2);
}
