//! Record kinds and the generic field-dispatch trait.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FieldError, ModelError};
use crate::field::{Assignment, FieldSpec, FieldValue};
use crate::records::{
    Document, Evaluation, EvaluationCost, Intervention, LinkOtherService, OtherMeasure,
    OutcomeMeasure, ProcessStandard,
};

/// The record types an import can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Evaluation,
    Intervention,
    OutcomeMeasure,
    OtherMeasure,
    Link,
    Cost,
    ProcessStandard,
    Document,
}

impl RecordKind {
    /// Child kinds in the order they are emitted for each report.
    pub const CHILDREN: [RecordKind; 7] = [
        RecordKind::Intervention,
        RecordKind::OutcomeMeasure,
        RecordKind::OtherMeasure,
        RecordKind::Link,
        RecordKind::Cost,
        RecordKind::ProcessStandard,
        RecordKind::Document,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Evaluation => "evaluation",
            RecordKind::Intervention => "intervention",
            RecordKind::OutcomeMeasure => "outcome_measure",
            RecordKind::OtherMeasure => "other_measure",
            RecordKind::Link => "link",
            RecordKind::Cost => "cost",
            RecordKind::ProcessStandard => "process_standard",
            RecordKind::Document => "document",
        }
    }

    /// Settable fields of this record kind, in declaration order.
    pub fn field_specs(&self) -> &'static [FieldSpec] {
        match self {
            RecordKind::Evaluation => Evaluation::FIELDS,
            RecordKind::Intervention => Intervention::FIELDS,
            RecordKind::OutcomeMeasure => OutcomeMeasure::FIELDS,
            RecordKind::OtherMeasure => OtherMeasure::FIELDS,
            RecordKind::Link => LinkOtherService::FIELDS,
            RecordKind::Cost => EvaluationCost::FIELDS,
            RecordKind::ProcessStandard => ProcessStandard::FIELDS,
            RecordKind::Document => Document::FIELDS,
        }
    }

    pub fn field_spec(&self, name: &str) -> Option<&'static FieldSpec> {
        self.field_specs().iter().find(|spec| spec.name == name)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "evaluation" => Ok(RecordKind::Evaluation),
            "intervention" => Ok(RecordKind::Intervention),
            "outcome_measure" => Ok(RecordKind::OutcomeMeasure),
            "other_measure" => Ok(RecordKind::OtherMeasure),
            "link" => Ok(RecordKind::Link),
            "cost" => Ok(RecordKind::Cost),
            "process_standard" => Ok(RecordKind::ProcessStandard),
            "document" => Ok(RecordKind::Document),
            other => Err(ModelError::UnknownRecordKind(other.to_string())),
        }
    }
}

/// Field-by-name access shared by all record types.
///
/// Implementations are generated by [`record!`](crate::record!), so every
/// declared field is reachable through `set_field`/`get_field` without
/// runtime reflection.
pub trait Record {
    fn kind(&self) -> RecordKind;

    fn id(&self) -> Uuid;

    fn field_specs(&self) -> &'static [FieldSpec] {
        self.kind().field_specs()
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<Assignment, FieldError>;

    fn get_field(&self, name: &str) -> Option<FieldValue>;

    /// Update bookkeeping timestamps before a save.
    fn touch(&mut self, now: DateTime<Utc>);
}

/// Declares a record struct together with its field table and setters.
///
/// ```ignore
/// record! {
///     pub struct Intervention(Intervention) {
///         keys {
///             pub evaluation_id: Uuid,
///         }
///         fields {
///             name: text(256),
///             brief_description: text,
///         }
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident ($kind:ident) {
            keys {
                $( $(#[$kmeta:meta])* pub $key:ident : $kty:ty ),* $(,)?
            }
            fields {
                $( $(#[$fmeta:meta])* $field:ident : $fkind:ident $( ($max:literal) )? ),* $(,)?
            }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            pub id: ::uuid::Uuid,
            $( $(#[$kmeta])* pub $key: $kty, )*
            $( $(#[$fmeta])* pub $field: $crate::record_field_type!($fkind), )*
            pub created_at: Option<::chrono::DateTime<::chrono::Utc>>,
            pub modified_at: Option<::chrono::DateTime<::chrono::Utc>>,
        }

        impl $name {
            pub const FIELDS: &'static [$crate::field::FieldSpec] = &[
                $(
                    $crate::field::FieldSpec {
                        name: stringify!($field),
                        kind: $crate::record_field_kind!($fkind $(, $max)?),
                    },
                )*
            ];
        }

        impl $crate::record::Record for $name {
            fn kind(&self) -> $crate::record::RecordKind {
                $crate::record::RecordKind::$kind
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn set_field(
                &mut self,
                name: &str,
                value: $crate::field::FieldValue,
            ) -> ::std::result::Result<$crate::field::Assignment, $crate::error::FieldError> {
                match name {
                    $(
                        stringify!($field) => $crate::field::FieldSlot::assign(
                            &mut self.$field,
                            name,
                            $crate::record_field_kind!($fkind $(, $max)?),
                            value,
                        ),
                    )*
                    _ => Err($crate::error::FieldError::UnknownField {
                        record: $crate::record::RecordKind::$kind,
                        field: name.to_string(),
                    }),
                }
            }

            fn get_field(&self, name: &str) -> Option<$crate::field::FieldValue> {
                match name {
                    $( stringify!($field) => $crate::field::FieldSlot::value(&self.$field), )*
                    _ => None,
                }
            }

            fn touch(&mut self, now: ::chrono::DateTime<::chrono::Utc>) {
                if self.created_at.is_none() {
                    self.created_at = Some(now);
                }
                self.modified_at = Some(now);
            }
        }
    };
}
