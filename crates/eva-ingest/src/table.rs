use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, Position, ReaderBuilder};

use crate::error::{IngestError, Result};

/// A parsed CSV: the first row as headers, every other non-blank row as data.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

impl RawTable {
    /// Build a table from already split rows, normalizing like the CSV reader does.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let headers: Vec<String> = headers
            .into_iter()
            .map(|header| normalize_header(header.as_ref()))
            .collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| normalize_cell(cell.as_ref()))
                    .collect::<Vec<_>>()
            })
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Position of the first column named `header`.
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|name| name == header)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn read_raw_table(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|error| IngestError::io(path, error))?;
    read_raw_table_from_reader(file, &path.display().to_string())
}

/// Parse CSV from any reader. Ragged rows are padded or cut to the header width.
///
/// Cells that are not valid UTF-8 (typically cp1252 exports) are decoded
/// lossily and reported once per row.
pub fn read_raw_table_from_reader<R: Read>(reader: R, source_name: &str) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = reader.byte_records();
    let Some(first) = records.next() else {
        return Ok(RawTable::default());
    };
    let csv_error = |source| IngestError::Csv {
        source_name: source_name.to_string(),
        source,
    };
    let headers = decode_record(&first.map_err(csv_error)?, source_name);

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(csv_error)?;
        rows.push(decode_record(&record, source_name));
    }

    let table = RawTable::from_rows(headers, rows);
    tracing::debug!(
        source = source_name,
        columns = table.headers.len(),
        rows = table.rows.len(),
        "read csv table"
    );
    Ok(table)
}

fn decode_record(record: &ByteRecord, source_name: &str) -> Vec<String> {
    let mut invalid = 0usize;
    let cells = record
        .iter()
        .map(|cell| {
            let text = String::from_utf8_lossy(cell);
            if let Cow::Owned(_) = text {
                invalid += 1;
            }
            text.into_owned()
        })
        .collect();
    if invalid > 0 {
        tracing::warn!(
            source = source_name,
            line = record.position().map(Position::line),
            cells = invalid,
            "invalid UTF-8 replaced"
        );
    }
    cells
}
