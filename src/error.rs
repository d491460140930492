use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: '{}'", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV error in '{}': {source}", path.display())]
    CsvFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing required column '{column}' in '{}'", path.display())]
    MissingColumn { column: String, path: PathBuf },

    #[error("Column '{column}' row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Negative wind speed {value} at row {row} has no real wind chill")]
    NegativeWind { row: usize, value: f64 },

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProcessingError {
    /// Attach a path to an I/O error so the message names the file involved
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProcessingError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn csv_file(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        ProcessingError::CsvFile {
            path: path.into(),
            source,
        }
    }
}
