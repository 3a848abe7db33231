#![allow(missing_docs)]

use std::fs;

use eva_model::{RecordKind, Resolution};
use eva_standards::{Standards, StandardsError};

#[test]
fn embedded_tables_load() {
    let standards = Standards::embedded().expect("embedded standards");
    assert!(standards.catalog.len() >= 10);

    let yes_no = standards.catalog.get("yes_no").expect("yes_no table");
    assert_eq!(yes_no.lookup("N"), Some("NO"));

    let organisation = standards.catalog.get("organisation").expect("organisation table");
    assert_eq!(
        organisation.lookup("Department for Transport"),
        Some("department-for-transport")
    );
    assert_eq!(organisation.lookup("dft"), Some("department-for-transport"));
}

#[test]
fn every_record_kind_has_mappings() {
    let standards = Standards::embedded().expect("embedded standards");
    let kinds: Vec<_> = standards.schema.record_kinds().collect();
    assert_eq!(kinds.len(), 8);
    for kind in RecordKind::CHILDREN {
        assert!(
            !standards.schema.mappings(kind).is_empty(),
            "{kind} has no mappings"
        );
    }
}

#[test]
fn link_header_feeds_two_fields() {
    let standards = Standards::embedded().expect("embedded standards");
    let fields: Vec<_> = standards
        .schema
        .mappings_for_header(RecordKind::Link, "gov_uk_link")
        .map(|mapping| (mapping.target_field, mapping.resolution))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("name_of_service", Resolution::Single),
            ("link_or_identifier", Resolution::Single),
        ]
    );
}

#[test]
fn quoted_headers_keep_their_commas() {
    let standards = Standards::embedded().expect("embedded standards");
    let mapping = standards
        .schema
        .mappings_for_header(RecordKind::Evaluation, "Participant consent (if no, why not)")
        .next()
        .expect("participant consent mapping");
    assert_eq!(mapping.target_field, "participant_consent");
}

#[test]
fn loads_tables_from_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("choices.csv"),
        "table,supports_other,label,code\nyes_no,no,Yes,YES\n",
    )
    .expect("write choices");
    fs::write(
        dir.path().join("schema.csv"),
        "record,header,field,resolution,kind\nevaluation,Fidelity,impact_fidelity,choice,yes_no\n",
    )
    .expect("write schema");

    let standards = Standards::from_dir(dir.path()).expect("load from dir");
    assert_eq!(standards.catalog.len(), 1);
    assert_eq!(standards.schema.len(), 1);
}

#[test]
fn missing_directory_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let error = Standards::from_dir(dir.path()).expect_err("no files");
    assert!(matches!(error, StandardsError::Io { .. }));
}

#[test]
fn choice_table_names_snapshot() {
    let standards = Standards::embedded().expect("embedded standards");
    let names: Vec<_> = standards.catalog.names().collect();
    insta::assert_debug_snapshot!(names);
}
