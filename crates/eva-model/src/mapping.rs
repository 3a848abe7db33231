//! Column mapping types: which CSV header feeds which record field, and how.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::choice::ChoiceTable;
use crate::error::ModelError;
use crate::record::RecordKind;

/// Reserved column holding the evaluation identifier.
pub const EVALUATION_ID_HEADER: &str = "Evaluation ID";
/// Reserved column holding the report identifier.
pub const REPORT_ID_HEADER: &str = "Report ID";

/// Strategy used to collapse many raw values into one field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The most frequent value (text) or the largest number (integers).
    Single,
    /// All values joined into one sentence list (text) or summed (integers).
    Combine,
    /// One code from a choice table.
    Choice,
    /// Every matching code from a choice table.
    MultipleChoice,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Single => "single",
            Resolution::Combine => "combine",
            Resolution::Choice => "choice",
            Resolution::MultipleChoice => "multiple_choice",
        }
    }

    pub fn uses_choices(&self) -> bool {
        matches!(self, Resolution::Choice | Resolution::MultipleChoice)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(Resolution::Single),
            "combine" => Ok(Resolution::Combine),
            "choice" => Ok(Resolution::Choice),
            "multiple_choice" => Ok(Resolution::MultipleChoice),
            other => Err(ModelError::UnknownResolution(other.to_string())),
        }
    }
}

/// Data kind of a mapped column.
#[derive(Debug, Clone)]
pub enum ValueKind {
    Str,
    Int,
    Choice(Arc<ChoiceTable>),
}

impl ValueKind {
    pub fn choice_table(&self) -> Option<&ChoiceTable> {
        match self {
            ValueKind::Choice(table) => Some(table),
            _ => None,
        }
    }
}

/// One header-to-field rule.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    pub source_header: String,
    pub target_field: &'static str,
    pub resolution: Resolution,
    pub kind: ValueKind,
}

impl ColumnMapping {
    /// Name of the companion field receiving unmatched choice text.
    pub fn other_field(&self) -> String {
        format!("{}_other", self.target_field)
    }
}

/// Header mappings for every record kind.
///
/// Built once at start-up and shared read-only by the resolvers.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    records: BTreeMap<RecordKind, Vec<ColumnMapping>>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RecordKind, mapping: ColumnMapping) {
        self.records.entry(record).or_default().push(mapping);
    }

    /// Mappings of one record kind, in declaration order.
    pub fn mappings(&self, record: RecordKind) -> &[ColumnMapping] {
        self.records
            .get(&record)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every mapping of `record` fed by `header`. A header may feed several fields.
    pub fn mappings_for_header<'a>(
        &'a self,
        record: RecordKind,
        header: &'a str,
    ) -> impl Iterator<Item = &'a ColumnMapping> + 'a {
        self.mappings(record)
            .iter()
            .filter(move |mapping| mapping.source_header == header)
    }

    /// Choice table backing `field` of `record`, if the field is choice-coded.
    pub fn choice_table_for(&self, record: RecordKind, field: &str) -> Option<&ChoiceTable> {
        self.mappings(record)
            .iter()
            .find(|mapping| mapping.target_field == field)
            .and_then(|mapping| mapping.kind.choice_table())
    }

    pub fn record_kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        self.records.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
