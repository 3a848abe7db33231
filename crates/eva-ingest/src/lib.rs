//! Ingestion for the evaluation import: reading the source CSV, keeping a
//! local copy of the remote file, and grouping rows by evaluation and report.

#![deny(unsafe_code)]

pub mod error;
pub mod grouping;
pub mod source;
pub mod table;

pub use error::{IngestError, Result};
pub use grouping::{RowGrouper, RowSet};
pub use source::{CachedSource, cache_path, cached_file_name, fetch_or_reuse};
pub use table::{RawTable, read_raw_table, read_raw_table_from_reader};
