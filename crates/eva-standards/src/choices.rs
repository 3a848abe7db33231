//! Choice table loader.
//!
//! Each row of `choices.csv` adds one label to a table:
//!
//! ```text
//! table,supports_other,label,code
//! yes_no,no,Yes,YES
//! yes_no,no,Y,YES
//! ```
//!
//! Rows of one table must agree on `supports_other`.

use std::collections::BTreeMap;

use eva_model::{ChoiceCatalog, ChoiceTable};

use crate::csv_utils::{read_csv_rows, require_field};
use crate::error::{Result, StandardsError};

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}

/// Parse choice tables from CSV text.
pub fn load_choice_catalog(text: &str, source_name: &str) -> Result<ChoiceCatalog> {
    let rows = read_csv_rows(text, source_name)?;
    let mut tables: BTreeMap<String, ChoiceTable> = BTreeMap::new();

    for row in &rows {
        let name = require_field(row, "table", source_name)?;
        let flag = require_field(row, "supports_other", source_name)?;
        let label = require_field(row, "label", source_name)?;
        let code = require_field(row, "code", source_name)?;

        let supports_other = parse_flag(flag).ok_or_else(|| {
            StandardsError::invalid(
                source_name,
                row.line,
                format!("supports_other must be yes or no, got {flag:?}"),
            )
        })?;

        let table = tables
            .entry(name.to_string())
            .or_insert_with(|| ChoiceTable::new(name, supports_other));
        if table.supports_other != supports_other {
            return Err(StandardsError::InconsistentOther {
                table: name.to_string(),
            });
        }
        table.add(label, code);
    }

    let mut catalog = ChoiceCatalog::new();
    for (_, table) in tables {
        tracing::debug!(table = %table.name, labels = table.entries().len(), "loaded choice table");
        catalog.insert(table);
    }
    Ok(catalog)
}
