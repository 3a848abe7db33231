use std::path::PathBuf;

use eva_ingest::IngestError;
use eva_model::{ModelError, RecordKind};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by an [`EvaluationStore`](crate::store::EvaluationStore).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: Uuid },

    #[error("failed to {operation} store file {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is not valid JSON")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to replace {target_path} with {temp_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors that abort an import run.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to fetch source file")]
    Download(#[source] IngestError),

    #[error("source table is unusable")]
    Table(#[source] IngestError),

    #[error("store operation failed")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
