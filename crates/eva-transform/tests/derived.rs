//! Tests for evaluation fields derived from several columns.

use eva_ingest::{RawTable, RowSet};
use eva_model::{Evaluation, SchemaMap};
use eva_standards::Standards;
use eva_transform::{DerivedFieldComputer, FieldResolver, ValueFilter};

const HEADERS: [&str; 8] = [
    "Evaluation ID",
    "Process",
    "Impact",
    "Economic",
    "Other evaluation type (please state)",
    "Issue to be addressed",
    "Ethics approval applied for",
    "Total number of people (or other unit) included in the evaluation",
];

fn derive(rows: Vec<Vec<&str>>) -> Evaluation {
    let standards = Standards::embedded().expect("standards");
    derive_with(&standards.schema, rows)
}

fn derive_with(schema: &SchemaMap, rows: Vec<Vec<&str>>) -> Evaluation {
    let table = RawTable::from_rows(HEADERS, rows);
    let filter = ValueFilter::default();
    let computer = DerivedFieldComputer::new(FieldResolver::new(schema, &filter));
    let mut evaluation = Evaluation::default();
    computer.compute(&mut evaluation, &RowSet::all(&table));
    evaluation
}

#[test]
fn majority_yes_selects_evaluation_type() {
    let evaluation = derive(vec![vec!["1", "N", "Y", "", "", "", "", ""]]);
    assert_eq!(evaluation.evaluation_type, vec!["IMPACT"]);
    assert_eq!(evaluation.evaluation_type_other, None);
}

#[test]
fn ties_do_not_select_a_type() {
    let evaluation = derive(vec![
        vec!["1", "Yes", "", "", "", "", "", ""],
        vec!["1", "no", "", "", "", "", "", ""],
        vec!["1", "", "", "true", "", "", "", ""],
    ]);
    assert_eq!(evaluation.evaluation_type, vec!["ECONOMIC"]);
}

#[test]
fn other_type_keeps_free_text() {
    let evaluation = derive(vec![
        vec!["1", "", "", "", "Y", "", "", ""],
        vec!["1", "", "", "", "Cost analysis.", "", "", ""],
    ]);
    assert_eq!(evaluation.evaluation_type, vec!["OTHER"]);
    assert_eq!(
        evaluation.evaluation_type_other.as_deref(),
        Some("Cost analysis.")
    );
}

#[test]
fn other_type_without_text_uses_placeholder() {
    let evaluation = derive(vec![vec!["1", "", "", "", "yes", "", "", ""]]);
    assert_eq!(
        evaluation.evaluation_type_other.as_deref(),
        Some("Other evaluation type (not stated)")
    );
}

#[test]
fn presence_flags_and_grants_placeholder() {
    let evaluation = derive(vec![vec![
        "1",
        "",
        "",
        "",
        "",
        "Issue to be addressed",
        "Information not provided",
        "",
    ]]);
    assert_eq!(evaluation.issue_description_option.as_deref(), Some("YES"));
    assert_eq!(evaluation.ethics_option.as_deref(), Some("NO"));
    assert_eq!(evaluation.grants_option.as_deref(), Some("NO"));
    assert!(evaluation.evaluation_type.is_empty());
}

#[test]
fn sample_size_details_keep_non_numeric_text() {
    let evaluation = derive(vec![
        vec!["1", "", "", "", "", "", "", "186"],
        vec!["1", "", "", "", "", "", "", "Around 40 schools"],
    ]);
    assert_eq!(
        evaluation.sample_size_details.as_deref(),
        Some("Around 40 schools.")
    );

    let numeric_only = derive(vec![vec!["1", "", "", "", "", "", "", "186"]]);
    assert_eq!(numeric_only.sample_size_details, None);
}

#[test]
fn sample_size_details_need_a_mapped_column() {
    let evaluation = derive_with(
        &SchemaMap::new(),
        vec![vec!["1", "", "", "", "", "", "", "Around 40 schools"]],
    );
    assert_eq!(evaluation.sample_size_details, None);
}
