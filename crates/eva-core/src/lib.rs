//! Import orchestration for the evaluation registry.
//!
//! [`ImportOrchestrator`] takes a source CSV (downloaded once into a data
//! directory), groups its rows by evaluation and report, resolves every mapped
//! column into records and writes them to an [`EvaluationStore`].

#![deny(unsafe_code)]

pub mod error;
pub mod import;
pub mod search;
pub mod store;

pub use error::{ImportError, Result, StoreError};
pub use import::{EvaluationOutcome, ImportOrchestrator, ImportReport};
pub use search::SearchIndexer;
pub use store::{EvaluationStore, InMemoryStore, JsonFileStore, StoreData, StoreResult};
