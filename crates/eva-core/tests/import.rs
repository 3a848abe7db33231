//! End-to-end import tests against the embedded standards.

use std::fs;
use std::path::Path;

use eva_core::{
    EvaluationOutcome, EvaluationStore, ImportError, ImportOrchestrator, InMemoryStore,
    JsonFileStore,
};
use eva_ingest::{IngestError, RawTable, read_raw_table};
use eva_model::{ChildRecord, Evaluation, RecordKind};
use eva_standards::Standards;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/full_row.csv");

fn standards() -> Standards {
    Standards::embedded().expect("embedded standards")
}

fn fixture_table() -> RawTable {
    read_raw_table(Path::new(FIXTURE)).expect("fixture table")
}

fn only_evaluation(store: &InMemoryStore) -> Evaluation {
    let evaluations: Vec<_> = store.data().evaluations.values().cloned().collect();
    assert_eq!(evaluations.len(), 1);
    evaluations.into_iter().next().expect("one evaluation")
}

fn only_child(store: &InMemoryStore, evaluation: &Evaluation, kind: RecordKind) -> ChildRecord {
    let children = store.children(evaluation.id, kind).expect("children");
    assert_eq!(children.len(), 1, "expected one {kind}");
    children.into_iter().next().expect("one child")
}

#[test]
fn minimal_row_sets_title_and_type() {
    let standards = standards();
    let table = RawTable::from_rows(
        ["Evaluation ID", "Report ID", "Evaluation title", "Impact", "Process"],
        vec![vec!["1", "1", "Evaluation title", "Y", "N"]],
    );
    let mut store = InMemoryStore::new();
    let report = ImportOrchestrator::new(&standards, &mut store)
        .import_table(&table)
        .expect("import");

    assert_eq!(report.imported, 1);
    assert_eq!(report.outcomes[0].child_count(), 0);
    let evaluation = only_evaluation(&store);
    assert_eq!(evaluation.title.as_deref(), Some("Evaluation title"));
    assert_eq!(evaluation.evaluation_type, vec!["IMPACT"]);
    assert!(evaluation.created_at.is_some());
}

#[test]
fn full_row_populates_evaluation() {
    let standards = standards();
    let mut store = InMemoryStore::new();
    let report = ImportOrchestrator::new(&standards, &mut store)
        .import_table(&fixture_table())
        .expect("import");
    assert_eq!(report.imported, 1);

    let evaluation = only_evaluation(&store);
    assert_eq!(evaluation.rsm_evaluation_id.as_deref(), Some("1"));
    assert_eq!(evaluation.title.as_deref(), Some("Evaluation title"));
    assert_eq!(evaluation.short_title.as_deref(), Some("Short evaluation title"));
    assert_eq!(evaluation.evaluation_type, vec!["IMPACT"]);
    assert_eq!(evaluation.evaluation_type_other, None);
    assert_eq!(evaluation.organisations, vec!["department-for-transport"]);
    assert_eq!(
        evaluation.brief_description.as_deref(),
        Some("A summary of the evaluation.")
    );
    assert_eq!(evaluation.issue_description_option.as_deref(), Some("YES"));
    assert_eq!(evaluation.ethics_option.as_deref(), Some("YES"));
    assert_eq!(evaluation.grants_option.as_deref(), Some("NO"));
    assert_eq!(
        evaluation.issue_description.as_deref(),
        Some("Issue to be addressed.")
    );
    assert_eq!(
        evaluation.who_improvements_matter_to.as_deref(),
        Some("Department for Transport.")
    );
    assert_eq!(evaluation.current_practice, None);
    assert_eq!(evaluation.issue_relevance.as_deref(), Some("Example text."));
    assert_eq!(evaluation.studied_population.as_deref(), Some("People."));
    assert_eq!(evaluation.sample_size, Some(186));
    assert_eq!(evaluation.sample_size_units.as_deref(), Some("people"));
    assert_eq!(evaluation.sample_size_details, None);
    assert_eq!(
        evaluation.process_for_recruitment.as_deref(),
        Some("Recruitment route.")
    );

    assert_eq!(evaluation.ethics_committee_approval.as_deref(), Some("NO"));
    assert_eq!(
        evaluation.ethics_committee_details.as_deref(),
        Some("A small ethical question.")
    );
    assert_eq!(evaluation.participant_consent.as_deref(), Some("N"));
    assert_eq!(
        evaluation.participant_payment.as_deref(),
        Some("Participant payment.")
    );
    assert_eq!(
        evaluation.other_ethical_information.as_deref(),
        Some("Other ethical info.")
    );

    assert_eq!(
        evaluation.impact_design_name,
        vec!["OUTPUT_OR_PERFORMANCE_MONITORING"]
    );
    assert_eq!(evaluation.impact_design_name_other, None);
    assert_eq!(
        evaluation.impact_design_approach_limitations.as_deref(),
        Some("Due to the limitations of both time and budget.")
    );
    assert_eq!(evaluation.impact_framework.as_deref(), Some("SUPERIORITY"));
    assert_eq!(evaluation.impact_framework_other, None);
    assert_eq!(evaluation.impact_basis.as_deref(), Some("INTENTION_TO_TREAT"));
    assert_eq!(
        evaluation.impact_analysis_set.as_deref(),
        Some("Interviewed 300 businesses.")
    );
    assert_eq!(evaluation.impact_effect_measure_type.as_deref(), Some("RELATIVE"));
    assert_eq!(
        evaluation.impact_effect_measure_interval.as_deref(),
        Some("CONFIDENCE")
    );
    assert_eq!(evaluation.impact_interpretation_type.as_deref(), Some("INTERVALS"));
    assert_eq!(evaluation.impact_interpretation_type_other, None);
    assert_eq!(evaluation.impact_fidelity.as_deref(), Some("YES"));
    assert_eq!(
        evaluation.impact_description_planned_analysis.as_deref(),
        Some("Description of analysis.")
    );

    assert!(evaluation.economic_type.is_empty());
    assert_eq!(
        evaluation.perspective_costs.as_deref(),
        Some("A lot of costs that are included.")
    );
    assert_eq!(
        evaluation.other_design_type.as_deref(),
        Some("Other evaluation design.")
    );
    assert_eq!(evaluation.impact_comparison, None);
    assert_eq!(evaluation.impact_outcome, None);
    assert_eq!(evaluation.impact_interpretation, None);
    assert_eq!(evaluation.impact_point_estimate_diff, None);
    assert_eq!(
        evaluation.economic_summary_findings.as_deref(),
        Some("Economic summary of findings.")
    );
    assert_eq!(evaluation.other_findings.as_deref(), Some("Other findings."));
}

#[test]
fn full_row_creates_one_child_of_each_kind() {
    let standards = standards();
    let mut store = InMemoryStore::new();
    let report = ImportOrchestrator::new(&standards, &mut store)
        .import_table(&fixture_table())
        .expect("import");
    assert_eq!(report.outcomes[0].child_count(), RecordKind::CHILDREN.len());

    let evaluation = only_evaluation(&store);

    let ChildRecord::Intervention(intervention) =
        only_child(&store, &evaluation, RecordKind::Intervention)
    else {
        panic!("expected intervention");
    };
    assert_eq!(
        intervention.name.as_deref(),
        Some("Local Sustainable Transport Fund")
    );
    assert_eq!(
        intervention.brief_description.as_deref(),
        Some("Intervention brief description.")
    );
    assert_eq!(intervention.fidelity.as_deref(), Some("How well was it delivered."));
    assert_eq!(intervention.geographical_information.as_deref(), Some("England."));

    let ChildRecord::OutcomeMeasure(outcome) =
        only_child(&store, &evaluation, RecordKind::OutcomeMeasure)
    else {
        panic!("expected outcome measure");
    };
    assert_eq!(outcome.name.as_deref(), Some("Reduced congestion"));
    assert_eq!(outcome.primary_or_secondary.as_deref(), Some("PRIMARY"));
    assert_eq!(outcome.direct_or_surrogate.as_deref(), Some("DIRECT"));
    assert_eq!(outcome.measure_type.as_deref(), Some("CONTINUOUS"));
    assert_eq!(outcome.measure_type_other, None);
    assert_eq!(
        outcome.description.as_deref(),
        Some("Average daily traffic counts")
    );
    assert_eq!(outcome.timepoint, None);

    let ChildRecord::OtherMeasure(other) =
        only_child(&store, &evaluation, RecordKind::OtherMeasure)
    else {
        panic!("expected other measure");
    };
    assert_eq!(other.name.as_deref(), Some("Another outcome"));
    assert_eq!(other.measure_type.as_deref(), Some("DISCRETE"));
    assert_eq!(other.collection_process.as_deref(), Some("Timing"));

    let ChildRecord::Link(link) = only_child(&store, &evaluation, RecordKind::Link) else {
        panic!("expected link");
    };
    assert_eq!(link.name_of_service.as_deref(), Some("https://www.google.com/"));
    assert_eq!(link.link_or_identifier.as_deref(), Some("https://www.google.com/"));

    let ChildRecord::ProcessStandard(standard) =
        only_child(&store, &evaluation, RecordKind::ProcessStandard)
    else {
        panic!("expected process standard");
    };
    assert_eq!(standard.name.as_deref(), Some("Name of standard or process."));
    assert_eq!(standard.conformity.as_deref(), Some("FULL"));

    let ChildRecord::Cost(cost) = only_child(&store, &evaluation, RecordKind::Cost) else {
        panic!("expected cost");
    };
    assert_eq!(cost.item_cost, Some(1000.0));
    assert_eq!(cost.description.as_deref(), Some("£69m funding programme."));

    let ChildRecord::Document(document) = only_child(&store, &evaluation, RecordKind::Document)
    else {
        panic!("expected document");
    };
    assert_eq!(document.title.as_deref(), Some("Report title"));
    assert_eq!(document.url, None);
    assert_eq!(document.document_types, vec!["OTHER"]);
    assert_eq!(document.document_types_other.as_deref(), Some("Report type."));
}

#[test]
fn search_text_covers_fields_children_and_labels() {
    let standards = standards();
    let mut store = InMemoryStore::new();
    ImportOrchestrator::new(&standards, &mut store)
        .import_table(&fixture_table())
        .expect("import");

    let evaluation = only_evaluation(&store);
    let text = evaluation.search_text.expect("search text");
    let parts: Vec<&str> = text.split('|').collect();
    assert_eq!(parts.first(), Some(&"Evaluation title"));
    assert_eq!(parts.last(), Some(&"Draft"));
    assert!(parts.contains(&"186"));
    assert!(parts.contains(&"Local Sustainable Transport Fund"));
    assert!(parts.contains(&"Department for Transport"));
    assert!(parts.contains(&"Impact evaluation"));
    assert!(!parts.contains(&"YES"), "presence flags are not indexed");
}

#[test]
fn second_run_skips_stored_evaluations() {
    let standards = standards();
    let table = fixture_table();
    let mut store = InMemoryStore::new();

    let first = ImportOrchestrator::new(&standards, &mut store)
        .import_table(&table)
        .expect("first import");
    let second = ImportOrchestrator::new(&standards, &mut store)
        .import_table(&table)
        .expect("second import");

    assert_eq!(first.imported, 1);
    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped_duplicate, 1);
    assert_eq!(
        second.outcomes,
        vec![EvaluationOutcome::SkippedDuplicate {
            external_id: "1".to_string()
        }]
    );
    assert_eq!(store.data().evaluations.len(), 1);
    assert_eq!(store.data().children.len(), RecordKind::CHILDREN.len());
}

#[test]
fn rows_are_merged_per_evaluation_and_split_per_report() {
    let standards = standards();
    let table = RawTable::from_rows(
        [
            "Evaluation ID",
            "Report ID",
            "Evaluation title",
            "Evaluation summary",
            "Intervention name",
            "Process",
            "Impact",
        ],
        vec![
            vec!["7", "1", "Bus pilot", "Buses ran late", "Bus lanes", "Y", "N"],
            vec!["7", "2", "Bus pilot", "Buses ran late.", "Bus gates", "Y", "N"],
            vec!["7", "2", "Bus pilot", "Fares fell", "", "N", "Y"],
            vec!["3", "1", "Rail review", "", "", "", ""],
            vec!["", "1", "Orphan row", "", "", "", ""],
        ],
    );
    let mut store = InMemoryStore::new();
    let report = ImportOrchestrator::new(&standards, &mut store)
        .import_table(&table)
        .expect("import");

    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped_missing_id, 1);
    let order: Vec<_> = report
        .outcomes
        .iter()
        .filter_map(EvaluationOutcome::external_id)
        .collect();
    assert_eq!(order, vec!["3", "7"]);

    let bus = store
        .data()
        .evaluations
        .values()
        .find(|evaluation| evaluation.rsm_evaluation_id.as_deref() == Some("7"))
        .cloned()
        .expect("bus evaluation");
    assert_eq!(bus.title.as_deref(), Some("Bus pilot"));
    assert_eq!(
        bus.brief_description.as_deref(),
        Some("Buses ran late. Fares fell.")
    );
    assert_eq!(bus.evaluation_type, vec!["PROCESS"]);

    let interventions = store
        .children(bus.id, RecordKind::Intervention)
        .expect("interventions");
    let names: Vec<_> = interventions
        .iter()
        .map(|child| match child {
            ChildRecord::Intervention(intervention) => intervention.name.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(
        names,
        vec![Some("Bus lanes".to_string()), Some("Bus gates".to_string())]
    );

    let rail = store
        .data()
        .evaluations
        .values()
        .find(|evaluation| evaluation.rsm_evaluation_id.as_deref() == Some("3"))
        .cloned()
        .expect("rail evaluation");
    assert!(rail.evaluation_type.is_empty());
    assert_eq!(rail.issue_description_option.as_deref(), Some("NO"));
    assert!(store
        .children(rail.id, RecordKind::Intervention)
        .expect("children")
        .is_empty());
}

#[test]
fn missing_report_column_is_rejected() {
    let standards = standards();
    let table = RawTable::from_rows(["Evaluation ID", "Evaluation title"], vec![vec!["1", "A"]]);
    let mut store = InMemoryStore::new();
    let error = ImportOrchestrator::new(&standards, &mut store)
        .import_table(&table)
        .expect_err("missing column");
    assert!(matches!(
        error,
        ImportError::Table(IngestError::MissingColumn { .. })
    ));
    assert!(store.data().evaluations.is_empty());
}

#[test]
fn cached_source_is_imported_into_file_store() {
    let data_dir = tempfile::tempdir().expect("temp dir");
    fs::copy(FIXTURE, data_dir.path().join("rsm.csv")).expect("seed cache");
    let store_path = data_dir.path().join("store").join("evaluations.json");
    let standards = standards();

    let mut store = JsonFileStore::open(&store_path).expect("open store");
    let report = ImportOrchestrator::new(&standards, &mut store)
        .import("https://example.org/exports/rsm.csv?version=2", data_dir.path())
        .expect("import");
    assert!(!report.downloaded);
    assert_eq!(report.source, Some(data_dir.path().join("rsm.csv")));
    assert_eq!(report.imported, 1);
    assert!(!store_path.with_extension("json.tmp").exists());

    let reopened = JsonFileStore::open(&store_path).expect("reopen store");
    assert_eq!(reopened.data(), store.data());
    let ids = reopened.existing_external_ids().expect("ids");
    assert!(ids.contains("1"));
    assert_eq!(reopened.data().children.len(), RecordKind::CHILDREN.len());
}
