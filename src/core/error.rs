/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Main application error type
///
/// Only batch-level failures live here. Row-level irregularities (unparseable
/// amounts, unknown locations, negative totals) are absorbed by the pipeline.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// The input table lacks a column the calculation cannot run without
    #[error("Missing required column: {0}")]
    MissingRequiredColumn(String),

    /// No usable transaction rows in the batch
    #[error("Input contains no usable transaction rows")]
    EmptyInput,

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading a rule file or input batch failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML rule file errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn missing_column(column: impl Into<String>) -> Self {
        AppError::MissingRequiredColumn(column.into())
    }

    /// True for the two failures a caller renders as a batch-level message
    pub fn is_terminal_input_error(&self) -> bool {
        matches!(self, AppError::MissingRequiredColumn(_) | AppError::EmptyInput)
    }
}
