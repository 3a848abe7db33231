//! Search text: a `|`-joined digest of an evaluation and its children used by
//! the registry's search page.

use eva_model::{
    ChildRecord, ChoiceCatalog, ChoiceTable, Evaluation, FieldKind, FieldValue, Record,
    RecordKind, SchemaMap,
};

/// Choice-coded fields filled outside the column schema, with their table.
const DERIVED_CHOICE_FIELDS: [(&str, &str); 1] = [("evaluation_type", "evaluation_type")];

const SEPARATOR: &str = "|";

/// Collects searchable text from records using the loaded choice tables.
#[derive(Debug, Clone, Copy)]
pub struct SearchIndexer<'a> {
    schema: &'a SchemaMap,
    catalog: &'a ChoiceCatalog,
}

impl<'a> SearchIndexer<'a> {
    pub fn new(schema: &'a SchemaMap, catalog: &'a ChoiceCatalog) -> Self {
        Self { schema, catalog }
    }

    /// Plain text and numbers of `record`, skipping choice-coded fields and
    /// the `_option` presence flags.
    fn plain_parts(&self, record: &dyn Record) -> Vec<String> {
        let kind = record.kind();
        let mut parts = Vec::new();
        for spec in record.field_specs() {
            if spec.name.ends_with("_option") || self.choice_table(kind, spec.name).is_some() {
                continue;
            }
            if spec.kind == FieldKind::List {
                continue;
            }
            match record.get_field(spec.name) {
                Some(FieldValue::Text(text)) if !text.is_empty() => parts.push(text),
                Some(FieldValue::Integer(number)) if number != 0 => parts.push(number.to_string()),
                Some(FieldValue::Float(amount)) if amount != 0.0 => parts.push(amount.to_string()),
                _ => {}
            }
        }
        parts
    }

    /// Display labels of every choice-coded field of `record`.
    fn choice_labels(&self, record: &dyn Record) -> Vec<String> {
        let kind = record.kind();
        let mut labels = Vec::new();
        for spec in record.field_specs() {
            let Some(table) = self.choice_table(kind, spec.name) else {
                continue;
            };
            let codes = match record.get_field(spec.name) {
                Some(FieldValue::Text(code)) => vec![code],
                Some(FieldValue::List(codes)) => codes,
                _ => continue,
            };
            for code in codes {
                let label = table.label_for(&code).map_or(code.clone(), String::from);
                labels.push(label);
            }
        }
        labels
    }

    fn choice_table(&self, kind: RecordKind, field: &str) -> Option<&'a ChoiceTable> {
        if let Some(table) = self.schema.choice_table_for(kind, field) {
            return Some(table);
        }
        if kind != RecordKind::Evaluation {
            return None;
        }
        let (_, table) = DERIVED_CHOICE_FIELDS
            .iter()
            .find(|(name, _)| *name == field)?;
        self.catalog.table(table)
    }

    /// Search text of one child record, or `None` when it has no text.
    pub fn child_text(&self, child: &ChildRecord) -> Option<String> {
        let record = child.as_record();
        let mut parts = self.plain_parts(record);
        parts.extend(self.choice_labels(record));
        (!parts.is_empty()).then(|| parts.join(SEPARATOR))
    }

    /// Search text of an evaluation: own text, then children, then choice labels and status.
    pub fn evaluation_text(&self, evaluation: &Evaluation, children: &[ChildRecord]) -> String {
        let mut parts = self.plain_parts(evaluation);
        parts.extend(children.iter().filter_map(|child| self.child_text(child)));
        parts.extend(self.choice_labels(evaluation));
        parts.push(evaluation.status.label().to_string());
        parts.join(SEPARATOR)
    }
}
