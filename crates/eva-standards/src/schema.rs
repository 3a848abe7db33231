//! Column schema loader.
//!
//! Each row of `schema.csv` maps one source header to one record field:
//!
//! ```text
//! record,header,field,resolution,kind
//! evaluation,Evaluation title,title,single,str
//! link,gov_uk_link,name_of_service,single,str
//! link,gov_uk_link,link_or_identifier,single,str
//! ```
//!
//! `kind` is `str`, `int` or the name of a choice table. Every row is checked
//! against the record's field table so a typo fails at start-up instead of
//! silently dropping a column during an import.

use eva_model::{
    ChoiceCatalog, ColumnMapping, FieldKind, RecordKind, Resolution, SchemaMap, ValueKind,
};

use crate::csv_utils::{CsvRow, read_csv_rows, require_field};
use crate::error::{Result, StandardsError};

/// Parse column mappings from CSV text, resolving choice kinds in `catalog`.
pub fn load_schema_map(text: &str, source_name: &str, catalog: &ChoiceCatalog) -> Result<SchemaMap> {
    let rows = read_csv_rows(text, source_name)?;
    let mut schema = SchemaMap::new();
    for row in &rows {
        let (record, mapping) = parse_mapping(row, source_name, catalog)?;
        schema.push(record, mapping);
    }
    tracing::debug!(source = source_name, mappings = schema.len(), "loaded column schema");
    Ok(schema)
}

fn parse_mapping(
    row: &CsvRow,
    source_name: &str,
    catalog: &ChoiceCatalog,
) -> Result<(RecordKind, ColumnMapping)> {
    let invalid = |message: String| StandardsError::invalid(source_name, row.line, message);

    let record: RecordKind = require_field(row, "record", source_name)?
        .parse()
        .map_err(|error| invalid(format!("{error}")))?;
    let header = require_field(row, "header", source_name)?;
    let field = require_field(row, "field", source_name)?;
    let resolution: Resolution = require_field(row, "resolution", source_name)?
        .parse()
        .map_err(|error| invalid(format!("{error}")))?;
    let kind_name = require_field(row, "kind", source_name)?;

    let spec = record
        .field_spec(field)
        .ok_or_else(|| invalid(format!("{record} has no field {field}")))?;

    let kind = match kind_name {
        "str" => ValueKind::Str,
        "int" => ValueKind::Int,
        table => ValueKind::Choice(
            catalog
                .get(table)
                .ok_or_else(|| invalid(format!("unknown choice table {table}")))?,
        ),
    };

    if resolution.uses_choices() != matches!(kind, ValueKind::Choice(_)) {
        return Err(invalid(format!(
            "resolution {resolution} cannot be used with kind {kind_name}"
        )));
    }

    let compatible = match (resolution, &kind) {
        (Resolution::MultipleChoice, _) => spec.kind == FieldKind::List,
        (Resolution::Choice, _) => spec.kind.is_text(),
        (_, ValueKind::Int) => spec.kind.is_numeric(),
        _ => spec.kind.is_text(),
    };
    if !compatible {
        return Err(invalid(format!(
            "{record}.{field} is {} and cannot take {resolution} {kind_name} values",
            spec.kind
        )));
    }

    let mapping = ColumnMapping {
        source_header: header.to_string(),
        target_field: spec.name,
        resolution,
        kind,
    };

    if let Some(table) = mapping.kind.choice_table()
        && table.supports_other
    {
        let other_field = mapping.other_field();
        if record.field_spec(&other_field).is_none() {
            return Err(StandardsError::MissingOtherField {
                record,
                field: field.to_string(),
                table: table.name.clone(),
                other_field,
            });
        }
    }

    Ok((record, mapping))
}
