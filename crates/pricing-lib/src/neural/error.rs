//! Failure taxonomy of a single child invocation

use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between spawning the child and holding a result.
///
/// None of these are fatal: `NeuralPredictor::predict` reports them and
/// returns `None`.
#[derive(Error, Debug)]
pub enum InvocationError {
    #[error("failed to start predictor process {interpreter}: {source}")]
    ProcessLaunchFailure {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no output received from predictor script")]
    NoOutputProduced,

    #[error("could not find valid JSON in output: {raw}")]
    FragmentNotFound { raw: String },

    #[error("failed to parse JSON output: {source}; raw output: {raw}")]
    PayloadParseFailure {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("error from predictor script: {0}")]
    ChildReportedError(String),

    #[error("missing required fields in JSON response: {}", .0.join(", "))]
    MissingRequiredField(Vec<&'static str>),

    #[error("field '{field}' is not numeric: {value}")]
    FieldConversionFailure { field: &'static str, value: String },

    #[error("predictor process did not exit within {0:?}")]
    DeadlineExceeded(Duration),

    #[error("error running predictor script: {0}")]
    Unexpected(#[from] std::io::Error),
}

impl InvocationError {
    /// Stable label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            InvocationError::ProcessLaunchFailure { .. } => "process_launch_failure",
            InvocationError::NoOutputProduced => "no_output_produced",
            InvocationError::FragmentNotFound { .. } => "fragment_not_found",
            InvocationError::PayloadParseFailure { .. } => "payload_parse_failure",
            InvocationError::ChildReportedError(_) => "child_reported_error",
            InvocationError::MissingRequiredField(_) => "missing_required_field",
            InvocationError::FieldConversionFailure { .. } => "field_conversion_failure",
            InvocationError::DeadlineExceeded(_) => "deadline_exceeded",
            InvocationError::Unexpected(_) => "unexpected",
        }
    }
}
