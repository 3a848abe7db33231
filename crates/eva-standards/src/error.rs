use std::path::PathBuf;

use eva_model::RecordKind;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {source_name}: {message}")]
    Csv { source_name: String, message: String },

    #[error("{source_name} line {line}: missing column {column}")]
    MissingColumn {
        source_name: String,
        line: usize,
        column: &'static str,
    },

    #[error("{source_name} line {line}: {message}")]
    InvalidRow {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("choice table {table} declares supports_other inconsistently")]
    InconsistentOther { table: String },

    #[error("{record}.{field} uses choice table {table} which accepts OTHER, but {record} has no field {other_field}")]
    MissingOtherField {
        record: RecordKind,
        field: String,
        table: String,
        other_field: String,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(source_name: &str, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidRow {
            source_name: source_name.to_string(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StandardsError>;
