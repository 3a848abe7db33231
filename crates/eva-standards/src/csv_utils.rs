//! Shared CSV utilities for loading standards files.

use std::collections::BTreeMap;

use csv::ReaderBuilder;

use crate::error::{Result, StandardsError};

/// One data row keyed by header, with its 1-based line number in the source.
#[derive(Debug, Clone)]
pub struct CsvRow {
    pub line: usize,
    pub fields: BTreeMap<String, String>,
}

/// Read CSV text into row maps.
///
/// Handles BOM characters and trims whitespace from headers and values.
pub fn read_csv_rows(text: &str, source_name: &str) -> Result<Vec<CsvRow>> {
    let csv_error = |error: csv::Error| StandardsError::Csv {
        source_name: source_name.to_string(),
        message: error.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let line = record
            .position()
            .map_or(rows.len() + 2, |pos| pos.line() as usize);
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), value.trim().to_string()))
            .collect();
        rows.push(CsvRow { line, fields });
    }
    Ok(rows)
}

/// Required field value; missing or empty is an error.
pub fn require_field<'a>(row: &'a CsvRow, key: &'static str, source_name: &str) -> Result<&'a str> {
    match row.fields.get(key) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(StandardsError::MissingColumn {
            source_name: source_name.to_string(),
            line: row.line,
            column: key,
        }),
    }
}
