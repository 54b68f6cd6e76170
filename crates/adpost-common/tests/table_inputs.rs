//! Loading inputs the way a report run does: priors from disk, ad table
//! from JSON, records and posteriors from both.

use adpost_common::{ad_records, AdPriors, Error, ErrorCategory};
use adpost_common::{DataTable, Metric};
use std::fs;

const ADS: &str = r#"{
    "columns": ["ad_name", "impressions", "clicks", "conversions", "cost", "revenue"],
    "rows": [
        ["Ad A", 1000, 92, 12, 1200.0, 2400.0],
        ["Ad B", "1050", 78, 9, 1500.0, 1800.0]
    ]
}"#;

#[test]
fn priors_file_and_table_feed_posteriors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("priors.json");
    fs::write(
        &path,
        r#"{"schema_version": "1.0.0", "ctr": {"alpha": 1.0, "beta": 10.0}}"#,
    )
    .unwrap();
    let priors = AdPriors::from_file(&path).unwrap();
    // unspecified priors fall back to defaults
    assert_eq!(priors.cpa, AdPriors::default().cpa);

    let table = DataTable::from_json(ADS).unwrap();
    let records = ad_records(&table, "ad_name").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].impressions, 1050.0);

    let ctr = records[0].ctr().posterior(&priors.ctr).unwrap();
    assert_eq!(ctr.params(), (93.0, 918.0));
    assert_eq!(ctr.family(), Metric::Ctr.family());

    let cpa = records[0].cpa().posterior(&priors.cpa).unwrap();
    assert_eq!(cpa.params(), (14.0, 1300.0));
    assert_eq!(records[0].revenue_per_conversion(), Some(200.0));
}

#[test]
fn missing_column_is_an_input_error() {
    let table = DataTable::from_json(r#"{"columns": ["ad_name", "clicks"], "rows": [["Ad A", 3]]}"#)
        .unwrap();
    let err = ad_records(&table, "ad_name").unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column } if column == "impressions"));
    assert_eq!(err.category(), ErrorCategory::Input);
}

#[test]
fn non_numeric_cell_names_column_and_row() {
    let table = DataTable::from_json(
        r#"{"columns": ["ad_name", "impressions", "clicks", "conversions", "cost", "revenue"],
            "rows": [["Ad A", 1000, "many", 1, 10, 20]]}"#,
    )
    .unwrap();
    match ad_records(&table, "ad_name").unwrap_err() {
        Error::InvalidCell { column, row, .. } => {
            assert_eq!(column, "clicks");
            assert_eq!(row, 0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unreadable_priors_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AdPriors::from_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
