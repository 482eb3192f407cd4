use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed header on line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("Line {line} is not covered by its storm header block: {reason}")]
    UncoveredDataLine { line: usize, reason: String },

    #[error("Invalid timestamp on line {line}: '{value}'")]
    InvalidTimestamp { line: usize, value: String },

    #[error("Invalid coordinate on line {line}: '{value}'")]
    InvalidCoordinate { line: usize, value: String },

    #[error("Invalid numeric value for {field} on line {line}: '{value}'")]
    InvalidNumeric {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Archive does not match the HURDAT2 layout: {0}")]
    LayoutMismatch(String),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Output commit stopped after moving {committed:?} into place: {source}")]
    PartialCommit {
        committed: Vec<String>,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ProcessingError {
    /// Archive line number the error refers to, when it has one
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ProcessingError::MalformedHeader { line, .. }
            | ProcessingError::UncoveredDataLine { line, .. }
            | ProcessingError::InvalidTimestamp { line, .. }
            | ProcessingError::InvalidCoordinate { line, .. }
            | ProcessingError::InvalidNumeric { line, .. } => Some(*line),
            _ => None,
        }
    }
}
