use crate::ast::Value;
use crate::validation::ValidationReport;
use thiserror::Error;

/// Errors that can occur while compiling authored conditions into expressions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("Condition type '{0}' has no registered parser")]
    UnknownConditionType(String),

    #[error("Condition '{condition}' expects a {expected} value, but found '{found}'")]
    InvalidValue {
        condition: String,
        expected: &'static str,
        found: String,
    },

    #[error("Operator '{operator}' is not supported by condition type '{condition_type}'")]
    UnsupportedOperator {
        condition_type: String,
        operator: String,
    },

    #[error("Condition '{0}' requires a key")]
    MissingKey(String),
}

/// Errors that can occur during expression evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },
}

/// Errors raised by library and editor operations.
#[derive(Error, Debug, Clone)]
pub enum EditError {
    #[error("Flow '{0}' not found")]
    FlowNotFound(String),

    #[error("Step '{step_id}' not found in flow '{flow_id}'")]
    StepNotFound { flow_id: String, step_id: String },

    #[error("Step id '{0}' is already used in this flow")]
    DuplicateStepId(String),

    #[error("Index {index} is out of bounds for a list of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Flow '{flow_id}' is a {status} and cannot be toggled; publish it first")]
    InvalidStatusTransition { flow_id: String, status: String },

    #[error("Flow '{flow_id}' failed validation with {} error(s)", .report.error_count())]
    ValidationFailed {
        flow_id: String,
        report: ValidationReport,
    },

    #[error("Flow name must not be empty")]
    EmptyName,

    #[error("No legacy number is left after {0}")]
    LegacyNumberExhausted(u32),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// Errors raised while running a preview.
#[derive(Error, Debug, Clone)]
pub enum PreviewError {
    #[error("Flow '{0}' has no steps to preview")]
    EmptyFlow(String),

    #[error("Preview has not been started")]
    NotStarted,

    #[error("Preview already finished")]
    Finished,

    #[error("Step '{0}' is not part of the flow")]
    UnknownStep(String),

    #[error("Preview visited {0} steps without finishing; the flow probably loops")]
    VisitLimit(usize),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// Errors from reading and writing flow files and published bundles.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Could not access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bundle serialization failed: {0}")]
    Encode(String),

    #[error("Bundle deserialization failed: {0}")]
    Decode(String),
}
