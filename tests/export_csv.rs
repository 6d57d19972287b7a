use std::fs;

use serde_json::json;
use tempfile::tempdir;

use sienge_export::export::{export_csv, ExportError, ITEM_COLUMNS};

#[test]
fn empty_traversal_writes_header_only() {
    let out = tempdir().unwrap();
    let path = out.path().join("empty.csv");

    let rows = export_csv(&[], &path).expect("export should succeed");

    assert_eq!(rows, 0);
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content, format!("{}\n", ITEM_COLUMNS.join(",")));
}

#[test]
fn missing_fields_do_not_shift_columns() {
    let out = tempdir().unwrap();
    let path = out.path().join("sparse.csv");
    let records = vec![json!({"taskId": "T1", "unitPrice": 99.9})];

    export_csv(&records, &path).expect("export should succeed");

    let content = fs::read_to_string(&path).unwrap();
    let row = content.lines().nth(1).unwrap();
    assert_eq!(row, "T1,,,,,,,99.9,,,");
}

#[test]
fn embedded_delimiters_are_quoted() {
    let out = tempdir().unwrap();
    let path = out.path().join("quoted.csv");
    let records = vec![json!({
        "taskId": "T1",
        "summary": "Excavation, phase 2",
    })];

    export_csv(&records, &path).expect("export should succeed");

    let content = fs::read_to_string(&path).unwrap();
    assert!(
        content.contains("\"Excavation, phase 2\""),
        "comma-bearing fields must be quoted, got: {content}"
    );
}

#[test]
fn extra_upstream_fields_are_ignored() {
    let out = tempdir().unwrap();
    let path = out.path().join("extra.csv");
    let records = vec![json!({
        "taskId": "T1",
        "internalAuditFlag": true,
    })];

    export_csv(&records, &path).expect("export should succeed");

    let content = fs::read_to_string(&path).unwrap();
    let row = content.lines().nth(1).unwrap();
    assert_eq!(row.split(',').count(), ITEM_COLUMNS.len());
    assert!(!content.contains("internalAuditFlag"));
}

#[test]
fn unwritable_destination_reports_an_io_error() {
    let out = tempdir().unwrap();
    let path = out.path().join("does-not-exist").join("out.csv");

    let err = export_csv(&[], &path).unwrap_err();

    let ExportError::Io { path: reported, .. } = err;
    assert_eq!(reported, path);
}
