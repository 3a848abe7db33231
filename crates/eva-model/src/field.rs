//! Typed field values and the slot trait used by generated record setters.
//!
//! Every record field is declared with a [`FieldKind`]. Resolved CSV values
//! arrive as a [`FieldValue`] and are assigned through [`FieldSlot`], which
//! enforces the kind: over-long text is truncated, anything of the wrong shape
//! is rejected with a [`FieldError`] and the slot is left untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Shape of the values a record field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    /// Free text, optionally limited to `max_length` characters.
    Text { max_length: Option<usize> },
    /// Non-negative whole number.
    Integer,
    /// Floating point amount.
    Float,
    /// List of choice codes.
    List,
}

impl FieldKind {
    pub fn max_length(&self) -> Option<usize> {
        match self {
            FieldKind::Text { max_length } => *max_length,
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, FieldKind::Text { .. })
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text {
                max_length: Some(max),
            } => write!(f, "text (max {max})"),
            FieldKind::Text { max_length: None } => f.write_str("text"),
            FieldKind::Integer => f.write_str("integer"),
            FieldKind::Float => f.write_str("float"),
            FieldKind::List => f.write_str("list"),
        }
    }
}

/// A resolved value ready to be assigned to a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

impl FieldValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::List(_) => "list",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

/// Static description of one settable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// What happened when a value was accepted by a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    Set,
    /// The text was cut down to `max_length - 1` characters.
    Truncated { original_len: usize, max_length: usize },
}

/// Storage for a single record field.
pub trait FieldSlot {
    fn assign(
        &mut self,
        field: &str,
        kind: FieldKind,
        value: FieldValue,
    ) -> Result<Assignment, FieldError>;

    fn value(&self) -> Option<FieldValue>;
}

fn wrong_type(field: &str, kind: FieldKind, value: &FieldValue) -> FieldError {
    FieldError::WrongType {
        field: field.to_string(),
        expected: kind,
        found: value.type_name(),
    }
}

impl FieldSlot for Option<String> {
    fn assign(
        &mut self,
        field: &str,
        kind: FieldKind,
        value: FieldValue,
    ) -> Result<Assignment, FieldError> {
        let text = match value {
            FieldValue::Text(text) => text,
            other => return Err(wrong_type(field, kind, &other)),
        };
        let original_len = text.chars().count();
        match kind.max_length() {
            Some(max_length) if original_len > max_length => {
                let keep = max_length.saturating_sub(1);
                *self = Some(text.chars().take(keep).collect());
                Ok(Assignment::Truncated {
                    original_len,
                    max_length,
                })
            }
            _ => {
                *self = Some(text);
                Ok(Assignment::Set)
            }
        }
    }

    fn value(&self) -> Option<FieldValue> {
        self.clone().map(FieldValue::Text)
    }
}

impl FieldSlot for Option<u64> {
    fn assign(
        &mut self,
        field: &str,
        kind: FieldKind,
        value: FieldValue,
    ) -> Result<Assignment, FieldError> {
        match value {
            FieldValue::Integer(number) => match u64::try_from(number) {
                Ok(number) => {
                    *self = Some(number);
                    Ok(Assignment::Set)
                }
                Err(_) => Err(wrong_type(field, kind, &value)),
            },
            other => Err(wrong_type(field, kind, &other)),
        }
    }

    fn value(&self) -> Option<FieldValue> {
        self.and_then(|number| i64::try_from(number).ok())
            .map(FieldValue::Integer)
    }
}

impl FieldSlot for Option<f64> {
    fn assign(
        &mut self,
        field: &str,
        kind: FieldKind,
        value: FieldValue,
    ) -> Result<Assignment, FieldError> {
        let amount = match value {
            FieldValue::Integer(number) => number as f64,
            FieldValue::Float(amount) if amount.is_finite() => amount,
            other => return Err(wrong_type(field, kind, &other)),
        };
        *self = Some(amount);
        Ok(Assignment::Set)
    }

    fn value(&self) -> Option<FieldValue> {
        self.map(FieldValue::Float)
    }
}

impl FieldSlot for Vec<String> {
    fn assign(
        &mut self,
        field: &str,
        kind: FieldKind,
        value: FieldValue,
    ) -> Result<Assignment, FieldError> {
        match value {
            FieldValue::List(codes) => {
                *self = codes;
                Ok(Assignment::Set)
            }
            other => Err(wrong_type(field, kind, &other)),
        }
    }

    fn value(&self) -> Option<FieldValue> {
        if self.is_empty() {
            None
        } else {
            Some(FieldValue::List(self.clone()))
        }
    }
}

/// Maps a field kind keyword to the Rust storage type.
#[macro_export]
#[doc(hidden)]
macro_rules! record_field_type {
    (text) => { Option<String> };
    (integer) => { Option<u64> };
    (float) => { Option<f64> };
    (list) => { Vec<String> };
}

/// Maps a field kind keyword (and optional max length) to its [`FieldKind`].
#[macro_export]
#[doc(hidden)]
macro_rules! record_field_kind {
    (text) => {
        $crate::field::FieldKind::Text { max_length: None }
    };
    (text, $max:literal) => {
        $crate::field::FieldKind::Text {
            max_length: Some($max),
        }
    };
    (integer) => {
        $crate::field::FieldKind::Integer
    };
    (float) => {
        $crate::field::FieldKind::Float
    };
    (list) => {
        $crate::field::FieldKind::List
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE: FieldKind = FieldKind::Text {
        max_length: Some(5),
    };

    #[test]
    fn text_within_limit_is_set() {
        let mut slot: Option<String> = None;
        let outcome = slot.assign("title", TITLE, "abc".into()).unwrap();
        assert_eq!(outcome, Assignment::Set);
        assert_eq!(slot.as_deref(), Some("abc"));
    }

    #[test]
    fn long_text_is_truncated_to_one_below_limit() {
        let mut slot: Option<String> = None;
        let outcome = slot.assign("title", TITLE, "abcdefgh".into()).unwrap();
        assert_eq!(
            outcome,
            Assignment::Truncated {
                original_len: 8,
                max_length: 5
            }
        );
        assert_eq!(slot.as_deref(), Some("abcd"));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let mut slot: Option<String> = None;
        slot.assign("title", TITLE, "££££££".into()).unwrap();
        assert_eq!(slot.as_deref(), Some("££££"));
    }

    #[test]
    fn negative_integer_is_rejected_and_slot_kept() {
        let mut slot: Option<u64> = Some(3);
        let error = slot
            .assign("sample_size", FieldKind::Integer, FieldValue::Integer(-1))
            .unwrap_err();
        assert!(matches!(error, FieldError::WrongType { .. }));
        assert_eq!(slot, Some(3));
    }

    #[test]
    fn text_into_list_is_rejected() {
        let mut slot: Vec<String> = vec!["IMPACT".to_string()];
        let error = slot
            .assign("evaluation_type", FieldKind::List, "IMPACT".into())
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "field evaluation_type expects list, got text"
        );
        assert_eq!(slot, vec!["IMPACT".to_string()]);
    }

    #[test]
    fn float_accepts_integers() {
        let mut slot: Option<f64> = None;
        slot.assign("item_cost", FieldKind::Float, FieldValue::Integer(1000))
            .unwrap();
        assert_eq!(slot, Some(1000.0));
    }
}
