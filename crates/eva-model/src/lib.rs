//! Data model for the evaluation registry import pipeline.
//!
//! - **records**: the `Evaluation` aggregate and its child record types
//! - **field**: typed field values and the slots that enforce field kinds
//! - **record**: record kinds and name-based field dispatch
//! - **choice**: choice tables mapping labels to canonical codes
//! - **mapping**: header-to-field column mappings and the schema map

#![deny(unsafe_code)]

pub mod choice;
pub mod error;
pub mod field;
pub mod mapping;
pub mod record;
pub mod records;

pub use choice::{ChoiceCatalog, ChoiceEntry, ChoiceTable, OTHER_CODE, normalize_label};
pub use error::{FieldError, ModelError, Result};
pub use field::{Assignment, FieldKind, FieldSlot, FieldSpec, FieldValue};
pub use mapping::{
    ColumnMapping, EVALUATION_ID_HEADER, REPORT_ID_HEADER, Resolution, SchemaMap, ValueKind,
};
pub use record::{Record, RecordKind};
pub use records::{
    ChildRecord, Document, Evaluation, EvaluationCost, EvaluationStatus, Intervention,
    LinkOtherService, OtherMeasure, OutcomeMeasure, ProcessStandard,
};
