use thiserror::Error;

/// Errors raised by the preprocessing, training and inference pipeline.
///
/// Every variant carries the column or field it concerns so a front end can
/// explain the failure. None of them is fatal to a [`crate::session::Session`]:
/// each is scoped to the operation that returned it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Dataset fetch or parse failure. Retrying is left to the user.
    #[error("failed to acquire dataset from {source_name}: {reason}")]
    Acquisition { source_name: String, reason: String },

    /// A normalization column has `max == min` (or no present values).
    #[error("column '{column}' has a degenerate range (min = max = {value}); normalization skipped")]
    DegenerateRange { column: String, value: f64 },

    #[error("label column '{column}' not found in table")]
    MissingLabelColumn { column: String },

    /// The fields supplied for a prediction do not match the trained feature columns.
    #[error("input fields do not match trained features (missing: {missing:?}, unexpected: {unexpected:?})")]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("column '{column}' not found in table")]
    UnknownColumn { column: String },

    #[error("column '{column}' is not numeric")]
    NotNumeric { column: String },

    #[error("value '{value}' is not a known category of '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("field '{field}' expects a number, got '{value}'")]
    InvalidFieldValue { field: String, value: String },

    #[error("feature '{column}' is missing a value at row {row}")]
    MissingFeatureValue { column: String, row: usize },

    #[error("invalid table: {0}")]
    InvalidTable(String),

    #[error("invalid train/test split: {0}")]
    InvalidSplit(String),

    #[error("cannot {action} while session is {state}")]
    InvalidState { action: &'static str, state: &'static str },

    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn acquisition(source_name: impl Into<String>, reason: impl ToString) -> Self {
        PipelineError::Acquisition {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
