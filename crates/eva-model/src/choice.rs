//! Choice tables: canonical codes for free-text labels.
//!
//! A [`ChoiceTable`] is an ordered list of `(label, code)` pairs. Several
//! labels may share one code (for example `Yes` and `Y` both map to `YES`);
//! the first label listed for a code is its display label.
//!
//! Matching is deliberately narrow: labels are compared case-insensitively
//! and with trailing periods removed. There is no stemming and no synonym
//! handling beyond the entries in the table.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Code assigned to values that match no label in a table that accepts them.
pub const OTHER_CODE: &str = "OTHER";

/// Normalizes a label or raw value for comparison.
pub fn normalize_label(value: &str) -> String {
    value.trim().trim_end_matches('.').trim_end().to_lowercase()
}

/// One selectable option of a choice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceEntry {
    pub label: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceTable {
    pub name: String,
    /// Whether unmatched values fall back to [`OTHER_CODE`] with their text
    /// kept in the companion `<field>_other` attribute.
    pub supports_other: bool,
    entries: Vec<ChoiceEntry>,
    /// Normalized label -> index into `entries`.
    index: BTreeMap<String, usize>,
}

impl ChoiceTable {
    pub fn new(name: impl Into<String>, supports_other: bool) -> Self {
        Self {
            name: name.into(),
            supports_other,
            entries: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Add a label. When two labels normalize identically the first one wins.
    pub fn add(&mut self, label: impl Into<String>, code: impl Into<String>) {
        let entry = ChoiceEntry {
            label: label.into(),
            code: code.into(),
        };
        let key = normalize_label(&entry.label);
        self.index.entry(key).or_insert(self.entries.len());
        self.entries.push(entry);
    }

    /// Builder-style variant of [`ChoiceTable::add`].
    #[must_use]
    pub fn with(mut self, label: &str, code: &str) -> Self {
        self.add(label, code);
        self
    }

    pub fn entries(&self) -> &[ChoiceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical code for a raw value, if it matches a label exactly.
    pub fn lookup(&self, value: &str) -> Option<&str> {
        let key = normalize_label(value);
        if key.is_empty() {
            return None;
        }
        self.index
            .get(&key)
            .map(|&idx| self.entries[idx].code.as_str())
    }

    /// Display label for a code (the first label listed for it).
    pub fn label_for(&self, code: &str) -> Option<&str> {
        if code == OTHER_CODE && self.supports_other {
            return Some(
                self.entries
                    .iter()
                    .find(|entry| entry.code == OTHER_CODE)
                    .map_or("Other", |entry| entry.label.as_str()),
            );
        }
        self.entries
            .iter()
            .find(|entry| entry.code == code)
            .map(|entry| entry.label.as_str())
    }
}

/// Named collection of choice tables, built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct ChoiceCatalog {
    tables: BTreeMap<String, Arc<ChoiceTable>>,
}

impl ChoiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: ChoiceTable) {
        self.tables.insert(table.name.clone(), Arc::new(table));
    }

    pub fn get(&self, name: &str) -> Option<Arc<ChoiceTable>> {
        self.tables.get(name).cloned()
    }

    /// Borrowing variant of [`ChoiceCatalog::get`].
    pub fn table(&self, name: &str) -> Option<&ChoiceTable> {
        self.tables.get(name).map(Arc::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
