use std::path::PathBuf;
use thiserror::Error;

/// Errors from the table I/O layer. The normalizers themselves never fail.
#[derive(Debug, Error)]
pub enum TidyError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write table '{table}': {source}")]
    Write {
        table: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },
    #[error("column '{column}' has {actual} values but table '{table}' has {expected} rows")]
    ColumnLength {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TidyError>;
