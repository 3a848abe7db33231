//! Evaluation aggregate and its child record types.
//!
//! Field names match the registry's storage columns. Text limits follow the
//! column definitions; unlimited text columns are declared without a limit.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ModelError, Result};
use crate::record;
use crate::record::{Record, RecordKind};

/// Publication status of an evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationStatus {
    #[default]
    Draft,
    Public,
    Private,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Draft => "DRAFT",
            EvaluationStatus::Public => "PUBLIC",
            EvaluationStatus::Private => "PRIVATE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EvaluationStatus::Draft => "Draft",
            EvaluationStatus::Public => "Public",
            EvaluationStatus::Private => "Private",
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

record! {
    /// One government policy evaluation.
    pub struct Evaluation(Evaluation) {
        keys {
            /// Identifier of the evaluation in the imported source file.
            pub rsm_evaluation_id: Option<String>,
            pub status: EvaluationStatus,
            pub search_text: Option<String>,
        }
        fields {
            title: text(256),
            short_title: text(64),
            brief_description: text,
            topics: list,
            organisations: list,
            doi: text(64),

            // Issue description
            issue_description_option: text(3),
            issue_description: text,
            those_experiencing_issue: text,
            why_improvements_matter: text,
            who_improvements_matter_to: text,
            current_practice: text,
            issue_relevance: text,

            evaluation_type: list,
            evaluation_type_other: text(256),

            // Studied population
            studied_population: text,
            eligibility_criteria: text,
            sample_size: integer,
            sample_size_units: text(256),
            sample_size_details: text,

            // Participant recruitment
            process_for_recruitment: text,
            recruitment_schedule: text,

            // Ethics
            ethics_option: text(3),
            ethics_committee_approval: text(3),
            ethics_committee_details: text,
            ethical_state_given_existing_evidence_base: text,
            risks_to_participants: text,
            risks_to_study_team: text,
            participant_involvement: text,
            participant_information: text,
            participant_consent: text,
            participant_payment: text,
            confidentiality_and_personal_data: text,
            breaking_confidentiality: text,
            other_ethical_information: text,

            grants_option: text(3),

            // Impact evaluation design
            impact_design_name: list,
            impact_design_name_other: text(256),
            impact_design_justification: text,
            impact_design_description: text,
            impact_design_features: text,
            impact_design_equity: text,
            impact_design_assumptions: text,
            impact_design_approach_limitations: text,

            // Impact evaluation analysis
            impact_framework: text(64),
            impact_framework_other: text(256),
            impact_basis: text(64),
            impact_basis_other: text(256),
            impact_analysis_set: text,
            impact_effect_measure_type: text(64),
            impact_effect_measure_type_other: text(256),
            impact_primary_effect_size_measure: text,
            impact_effect_measure_interval: text(64),
            impact_effect_measure_interval_other: text(256),
            impact_primary_effect_size_desc: text,
            impact_interpretation_type: text(64),
            impact_interpretation_type_other: text(256),
            impact_sensitivity_analysis: text,
            impact_subgroup_analysis: text,
            impact_missing_data_handling: text,
            impact_fidelity: text(10),
            impact_description_planned_analysis: text,

            // Process evaluation
            process_design: text,
            process_methods: text(256),
            process_analysis_description: text,

            // Economic evaluation
            economic_type: list,
            perspective_costs: text,
            perspective_benefits: text,
            monetisation_approaches: text,
            economic_design_details: text,
            economic_analysis_description: text,

            // Other evaluation
            other_design_type: text,
            other_design_details: text,
            other_analysis_description: text,

            // Findings
            impact_comparison: text,
            impact_outcome: text,
            impact_interpretation: text(256),
            impact_interpretation_other: text(256),
            impact_point_estimate_diff: text,
            impact_lower_uncertainty: text,
            impact_upper_uncertainty: text,
            impact_summary_findings: text,
            impact_findings: text,
            economic_summary_findings: text,
            economic_findings: text,
            process_summary_findings: text,
            process_findings: text,
            other_summary_findings: text,
            other_findings: text,
        }
    }
}

record! {
    pub struct Intervention(Intervention) {
        keys {
            pub evaluation_id: Uuid,
        }
        fields {
            name: text(256),
            brief_description: text,
            rationale: text,
            materials_used: text,
            procedures: text,
            provider_description: text,
            modes_of_delivery: text,
            location: text,
            frequency_of_delivery: text,
            tailoring: text,
            fidelity: text,
            resource_requirements: text,
            geographical_information: text,
        }
    }
}

record! {
    pub struct OutcomeMeasure(OutcomeMeasure) {
        keys {
            pub evaluation_id: Uuid,
        }
        fields {
            name: text(256),
            primary_or_secondary: text(10),
            direct_or_surrogate: text(10),
            measure_type: text(256),
            measure_type_other: text(256),
            description: text,
            collection_process: text,
            timepoint: text,
            minimum_difference: text,
            relevance: text,
        }
    }
}

record! {
    pub struct OtherMeasure(OtherMeasure) {
        keys {
            pub evaluation_id: Uuid,
        }
        fields {
            name: text(256),
            measure_type: text(256),
            measure_type_other: text(256),
            description: text,
            collection_process: text,
        }
    }
}

record! {
    /// Link to a related service or published page.
    pub struct LinkOtherService(Link) {
        keys {
            pub evaluation_id: Uuid,
        }
        fields {
            name_of_service: text(256),
            link_or_identifier: text(256),
        }
    }
}

record! {
    pub struct EvaluationCost(Cost) {
        keys {
            pub evaluation_id: Uuid,
        }
        fields {
            item_name: text,
            description: text,
            item_cost: float,
        }
    }
}

record! {
    pub struct ProcessStandard(ProcessStandard) {
        keys {
            pub evaluation_id: Uuid,
        }
        fields {
            name: text(256),
            conformity: text(10),
            description: text,
        }
    }
}

record! {
    /// A cited report or associated document.
    pub struct Document(Document) {
        keys {
            pub evaluation_id: Uuid,
        }
        fields {
            title: text(256),
            url: text(512),
            description: text,
            document_types: list,
            document_types_other: text(256),
        }
    }
}

/// Any record owned by an [`Evaluation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChildRecord {
    Intervention(Intervention),
    OutcomeMeasure(OutcomeMeasure),
    OtherMeasure(OtherMeasure),
    Link(LinkOtherService),
    Cost(EvaluationCost),
    ProcessStandard(ProcessStandard),
    Document(Document),
}

impl ChildRecord {
    /// Create an empty child of `kind` linked to `evaluation_id`.
    pub fn new(kind: RecordKind, id: Uuid, evaluation_id: Uuid) -> Result<Self> {
        let child = match kind {
            RecordKind::Evaluation => return Err(ModelError::NotAChild(kind)),
            RecordKind::Intervention => ChildRecord::Intervention(Intervention {
                id,
                evaluation_id,
                ..Intervention::default()
            }),
            RecordKind::OutcomeMeasure => ChildRecord::OutcomeMeasure(OutcomeMeasure {
                id,
                evaluation_id,
                ..OutcomeMeasure::default()
            }),
            RecordKind::OtherMeasure => ChildRecord::OtherMeasure(OtherMeasure {
                id,
                evaluation_id,
                ..OtherMeasure::default()
            }),
            RecordKind::Link => ChildRecord::Link(LinkOtherService {
                id,
                evaluation_id,
                ..LinkOtherService::default()
            }),
            RecordKind::Cost => ChildRecord::Cost(EvaluationCost {
                id,
                evaluation_id,
                ..EvaluationCost::default()
            }),
            RecordKind::ProcessStandard => ChildRecord::ProcessStandard(ProcessStandard {
                id,
                evaluation_id,
                ..ProcessStandard::default()
            }),
            RecordKind::Document => ChildRecord::Document(Document {
                id,
                evaluation_id,
                ..Document::default()
            }),
        };
        Ok(child)
    }

    pub fn evaluation_id(&self) -> Uuid {
        match self {
            ChildRecord::Intervention(record) => record.evaluation_id,
            ChildRecord::OutcomeMeasure(record) => record.evaluation_id,
            ChildRecord::OtherMeasure(record) => record.evaluation_id,
            ChildRecord::Link(record) => record.evaluation_id,
            ChildRecord::Cost(record) => record.evaluation_id,
            ChildRecord::ProcessStandard(record) => record.evaluation_id,
            ChildRecord::Document(record) => record.evaluation_id,
        }
    }

    pub fn as_record(&self) -> &dyn Record {
        match self {
            ChildRecord::Intervention(record) => record,
            ChildRecord::OutcomeMeasure(record) => record,
            ChildRecord::OtherMeasure(record) => record,
            ChildRecord::Link(record) => record,
            ChildRecord::Cost(record) => record,
            ChildRecord::ProcessStandard(record) => record,
            ChildRecord::Document(record) => record,
        }
    }

    pub fn as_record_mut(&mut self) -> &mut dyn Record {
        match self {
            ChildRecord::Intervention(record) => record,
            ChildRecord::OutcomeMeasure(record) => record,
            ChildRecord::OtherMeasure(record) => record,
            ChildRecord::Link(record) => record,
            ChildRecord::Cost(record) => record,
            ChildRecord::ProcessStandard(record) => record,
            ChildRecord::Document(record) => record,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.as_record().kind()
    }

    pub fn id(&self) -> Uuid {
        self.as_record().id()
    }
}
