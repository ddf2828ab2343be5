use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data folder not found: {}", .0.display())]
    DataFolderMissing(PathBuf),

    #[error("No CSV files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    #[error("Could not decode {} with any supported encoding", .0.display())]
    UnreadableEncoding(PathBuf),

    #[error("Required coordinate columns missing: {}", .0.join(", "))]
    MissingRequiredColumns(Vec<String>),

    #[error("No rows with valid site coordinates after cleaning")]
    EmptyAfterCleaning,

    #[error("Unknown filter column: '{0}'")]
    UnknownFilterColumn(String),

    #[error("Invalid filter expression: '{0}' (expected COLUMN=VALUE)")]
    InvalidFilter(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
