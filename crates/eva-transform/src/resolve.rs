//! Per-column resolution of many raw values into one record field.

use eva_ingest::RowSet;
use eva_model::{
    Assignment, ColumnMapping, FieldValue, Record, RecordKind, Resolution, SchemaMap, ValueKind,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::choice::{resolve_multiple_choice, resolve_single_choice};
use crate::filter::{FilteredValues, ValueFilter, join_sentences};
use crate::numeric::parse_i64;

/// A resolved field value plus the text for its `<field>_other` companion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedField {
    pub value: Option<FieldValue>,
    pub other: Option<String>,
}

impl ResolvedField {
    fn value(value: FieldValue) -> Self {
        Self {
            value: Some(value),
            other: None,
        }
    }

    fn unset() -> Self {
        Self::default()
    }
}

/// Collapse filtered values according to the mapping's resolution method.
pub fn resolve(mapping: &ColumnMapping, values: &FilteredValues) -> ResolvedField {
    match (mapping.resolution, &mapping.kind) {
        (Resolution::Combine, ValueKind::Int) => {
            let sum = distinct_integers(values).fold(0i64, i64::saturating_add);
            ResolvedField::value(FieldValue::Integer(sum))
        }
        (Resolution::Single, ValueKind::Int) => {
            let max = distinct_integers(values).max().unwrap_or(0);
            ResolvedField::value(FieldValue::Integer(max))
        }
        (Resolution::Combine, _) => {
            match join_sentences(values.distinct().iter().map(String::as_str)) {
                Some(text) => ResolvedField::value(FieldValue::Text(text)),
                None => ResolvedField::unset(),
            }
        }
        (Resolution::Single, _) => match values.modal() {
            Some(text) => ResolvedField::value(FieldValue::Text(text.to_string())),
            None => ResolvedField::unset(),
        },
        (Resolution::Choice, ValueKind::Choice(table)) => {
            match resolve_single_choice(values, table) {
                Some(matched) => ResolvedField {
                    value: Some(FieldValue::Text(matched.code)),
                    other: matched.other,
                },
                None => ResolvedField::unset(),
            }
        }
        (Resolution::MultipleChoice, ValueKind::Choice(table)) => {
            match resolve_multiple_choice(values, table) {
                Some(matched) => ResolvedField {
                    value: Some(FieldValue::List(matched.codes)),
                    other: matched.other,
                },
                None => ResolvedField::unset(),
            }
        }
        (Resolution::Choice | Resolution::MultipleChoice, _) => {
            warn!(
                field = mapping.target_field,
                "choice resolution without a choice table"
            );
            ResolvedField::unset()
        }
    }
}

fn distinct_integers(values: &FilteredValues) -> impl Iterator<Item = i64> + '_ {
    values.distinct().iter().filter_map(|value| parse_i64(value))
}

/// Counts of field assignments made while populating a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyStats {
    pub set: usize,
    pub truncated: usize,
    pub rejected: usize,
}

impl ApplyStats {
    pub fn merge(&mut self, other: ApplyStats) {
        self.set += other.set;
        self.truncated += other.truncated;
        self.rejected += other.rejected;
    }
}

/// Assign one value, logging instead of failing.
///
/// Over-long text is truncated by the field itself; a value of the wrong
/// shape leaves the field unchanged.
pub fn assign_field(
    record: &mut dyn Record,
    field: &str,
    value: FieldValue,
    stats: &mut ApplyStats,
) {
    let kind = record.kind();
    match record.set_field(field, value) {
        Ok(Assignment::Set) => stats.set += 1,
        Ok(Assignment::Truncated {
            original_len,
            max_length,
        }) => {
            warn!(
                record = %kind,
                field,
                original_len,
                max_length,
                "value too long, truncated"
            );
            stats.set += 1;
            stats.truncated += 1;
        }
        Err(error) => {
            warn!(record = %kind, field, %error, "value dropped");
            stats.rejected += 1;
        }
    }
}

/// Populates records from grouped rows using the schema map.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    schema: &'a SchemaMap,
    filter: &'a ValueFilter,
}

impl<'a> FieldResolver<'a> {
    pub fn new(schema: &'a SchemaMap, filter: &'a ValueFilter) -> Self {
        Self { schema, filter }
    }

    pub fn schema(&self) -> &'a SchemaMap {
        self.schema
    }

    /// Filtered values of `header` across `rows`.
    pub fn values(&self, rows: &RowSet<'_>, header: &str) -> FilteredValues {
        self.filter.filter(rows.values(header))
    }

    /// Whether any column mapped for `kind` carries a usable value in `rows`.
    pub fn has_values(&self, kind: RecordKind, rows: &RowSet<'_>) -> bool {
        self.schema
            .mappings(kind)
            .iter()
            .any(|mapping| !self.values(rows, &mapping.source_header).is_empty())
    }

    /// Resolve and assign every mapping of the record's kind whose column is present.
    pub fn populate(&self, record: &mut dyn Record, rows: &RowSet<'_>) -> ApplyStats {
        let mut stats = ApplyStats::default();
        for mapping in self.schema.mappings(record.kind()) {
            if !rows.has_column(&mapping.source_header) {
                continue;
            }
            let values = self.values(rows, &mapping.source_header);
            let resolved = resolve(mapping, &values);
            self.apply(record, mapping, resolved, &mut stats);
        }
        debug!(
            record = %record.kind(),
            set = stats.set,
            truncated = stats.truncated,
            rejected = stats.rejected,
            "populated record"
        );
        stats
    }

    fn apply(
        &self,
        record: &mut dyn Record,
        mapping: &ColumnMapping,
        resolved: ResolvedField,
        stats: &mut ApplyStats,
    ) {
        if let Some(value) = resolved.value {
            assign_field(record, mapping.target_field, value, stats);
        }
        if let Some(other) = resolved.other {
            let other_field = mapping.other_field();
            if record.kind().field_spec(&other_field).is_some() {
                assign_field(record, &other_field, FieldValue::Text(other), stats);
            } else {
                debug!(field = %other_field, "no companion field for OTHER text");
            }
        }
    }
}
