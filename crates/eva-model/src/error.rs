use thiserror::Error;

use crate::field::FieldKind;
use crate::record::RecordKind;

/// Errors raised while assigning a value to a record field.
///
/// These are always recoverable: callers log them and leave the field unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("{record} has no field named {field}")]
    UnknownField { record: RecordKind, field: String },
    #[error("field {field} expects {expected}, got {found}")]
    WrongType {
        field: String,
        expected: FieldKind,
        found: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown record kind: {0}")]
    UnknownRecordKind(String),
    #[error("unknown resolution method: {0}")]
    UnknownResolution(String),
    #[error("{0} is not a child record kind")]
    NotAChild(RecordKind),
}

pub type Result<T> = std::result::Result<T, ModelError>;
