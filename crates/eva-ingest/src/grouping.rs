//! Row grouping by the reserved evaluation and report identifier columns.

use std::collections::BTreeMap;

use eva_model::{EVALUATION_ID_HEADER, REPORT_ID_HEADER};

use crate::error::{IngestError, Result};
use crate::table::RawTable;

/// Borrowed subset of a table's rows, in source order.
#[derive(Debug, Clone)]
pub struct RowSet<'a> {
    headers: &'a [String],
    rows: Vec<&'a [String]>,
}

impl<'a> RowSet<'a> {
    pub fn new(headers: &'a [String], rows: Vec<&'a [String]>) -> Self {
        Self { headers, rows }
    }

    /// Every row of `table`.
    pub fn all(table: &'a RawTable) -> Self {
        Self::new(
            &table.headers,
            table.rows.iter().map(Vec::as_slice).collect(),
        )
    }

    pub fn headers(&self) -> &'a [String] {
        self.headers
    }

    pub fn rows(&self) -> &[&'a [String]] {
        &self.rows
    }

    pub fn has_column(&self, header: &str) -> bool {
        self.headers.iter().any(|name| name == header)
    }

    /// Raw cells of column `header` across all rows; empty when the column is absent.
    pub fn values(&self, header: &str) -> Vec<&'a str> {
        let Some(idx) = self.headers.iter().position(|name| name == header) else {
            return Vec::new();
        };
        self.rows.iter().map(|row| row[idx].as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partitions rows by evaluation, then by report.
///
/// Both groupings keep source row order inside a group and order groups by
/// key. Rows with an empty key land under `""`.
#[derive(Debug, Clone, Copy)]
pub struct RowGrouper {
    evaluation_idx: usize,
    report_idx: usize,
}

impl RowGrouper {
    /// Locate the reserved key columns in `headers`.
    pub fn new(headers: &[String]) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|name| name == column)
                .ok_or_else(|| IngestError::MissingColumn {
                    column: column.to_string(),
                })
        };
        Ok(Self {
            evaluation_idx: find(EVALUATION_ID_HEADER)?,
            report_idx: find(REPORT_ID_HEADER)?,
        })
    }

    pub fn group_by_evaluation<'a>(&self, rows: &RowSet<'a>) -> BTreeMap<String, RowSet<'a>> {
        group(rows, self.evaluation_idx)
    }

    pub fn group_by_report<'a>(&self, rows: &RowSet<'a>) -> BTreeMap<String, RowSet<'a>> {
        group(rows, self.report_idx)
    }
}

fn group<'a>(rows: &RowSet<'a>, idx: usize) -> BTreeMap<String, RowSet<'a>> {
    let mut groups: BTreeMap<String, RowSet<'a>> = BTreeMap::new();
    for &row in rows.rows() {
        groups
            .entry(row[idx].clone())
            .or_insert_with(|| RowSet::new(rows.headers(), Vec::new()))
            .rows
            .push(row);
    }
    groups
}
