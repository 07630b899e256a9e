//! External neural-network predictor
//!
//! The neural network is trained and queried by a separate script. This
//! module launches it, drains its output, pulls the JSON result out of the
//! surrounding text and validates it. Any failure along the way is reported
//! through the [`DiagnosticSink`] and turns into `None`; nothing here
//! propagates an error to the caller.

mod collector;
mod error;
mod extract;
mod launcher;
mod payload;


pub use collector::{collect, decode_ascii, RawProcessOutput};
pub use error::InvocationError;
pub use extract::{extract_fragment, ExtractedFragment};
pub use launcher::{
    resolve_interpreter, resolve_interpreter_with, Launcher, CHILD_ENV, DEFAULT_PYTHON,
    DEFAULT_SCRIPT_NAME, PYTHON_ENV_VAR,
};
pub use payload::{map_result, parse_payload, validate, ParsedPayload, ERROR_FIELD, REQUIRED_FIELDS};

use crate::diagnostics::{DiagnosticKind, DiagnosticSink, TracingSink};
use crate::models::{PredictionRequest, PredictionResult};
use crate::observability::{PredictorMetrics, OUTCOME_SUCCESS};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Invokes the neural-network script once per prediction.
///
/// Configuration is fixed at construction; the predictor keeps no state
/// between calls and can be shared across tasks.
pub struct NeuralPredictor {
    launcher: Launcher,
    deadline: Option<Duration>,
    sink: Arc<dyn DiagnosticSink>,
    metrics: PredictorMetrics,
}

impl NeuralPredictor {
    /// Builder with the default script name, no deadline and a tracing sink
    pub fn builder() -> NeuralPredictorBuilder {
        NeuralPredictorBuilder::new()
    }

    pub fn interpreter(&self) -> &Path {
        self.launcher.interpreter()
    }

    pub fn script_path(&self) -> &Path {
        self.launcher.script_path()
    }

    pub fn working_dir(&self) -> &Path {
        self.launcher.working_dir()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Run the script for `request`.
    ///
    /// Returns `None` on any failure, after reporting the cause.
    pub async fn predict(&self, request: &PredictionRequest) -> Option<PredictionResult> {
        let start = Instant::now();
        let outcome = self.try_predict(request).await;
        self.metrics.observe_child_latency(start.elapsed().as_secs_f64());

        match outcome {
            Ok(result) => {
                self.metrics.inc_child_outcome(OUTCOME_SUCCESS);
                info!(
                    event = "neural_prediction",
                    predicted_price = result.predicted_price,
                    r2 = result.r2,
                    mae = result.mae,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Neural network prediction received"
                );
                Some(result)
            }
            Err(err) => {
                self.metrics.inc_child_outcome(err.kind());
                debug!(kind = err.kind(), "Neural network prediction failed");
                self.sink.report(DiagnosticKind::Error, &err.to_string());
                None
            }
        }
    }

    /// The full pipeline with errors surfaced instead of reported
    pub async fn try_predict(&self, request: &PredictionRequest) -> Result<PredictionResult, InvocationError> {
        let child = self.launcher.spawn(request)?;
        let output = collect(child, self.deadline).await?;

        if output.exit_observed && output.exit_code != Some(0) {
            // Exit status alone does not decide the outcome
            debug!(exit_code = ?output.exit_code, "Predictor script exited unsuccessfully");
        }

        let stderr = output.stderr.trim_end();
        if !stderr.is_empty() {
            self.sink.report(DiagnosticKind::RawStderr, stderr);
        }
        if output.stdout.is_empty() {
            return Err(InvocationError::NoOutputProduced);
        }

        let fragment = extract_fragment(&output.stdout)?;
        let payload = parse_payload(&fragment.json_candidate, &output.stdout)?;
        validate(&payload)?;

        if !fragment.preamble_text.is_empty() {
            self.sink.relay(&fragment.preamble_text);
        }

        map_result(&payload)
    }
}

/// Builder for [`NeuralPredictor`]
pub struct NeuralPredictorBuilder {
    interpreter: Option<String>,
    working_dir: Option<PathBuf>,
    script_name: String,
    deadline: Option<Duration>,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl NeuralPredictorBuilder {
    pub fn new() -> Self {
        Self {
            interpreter: None,
            working_dir: None,
            script_name: DEFAULT_SCRIPT_NAME.to_string(),
            deadline: None,
            sink: None,
        }
    }

    /// Explicit interpreter; an empty string counts as unset
    pub fn interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = Some(interpreter.into());
        self
    }

    /// Directory the script lives in and runs from (default: current directory)
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn script_name(mut self, name: impl Into<String>) -> Self {
        self.script_name = name.into();
        self
    }

    /// Kill the child and fail if it runs longer than this
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> Result<NeuralPredictor> {
        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };
        if self.script_name.is_empty() {
            anyhow::bail!("Predictor script name must not be empty");
        }

        let interpreter = resolve_interpreter(self.interpreter.as_deref());
        let launcher = Launcher::new(interpreter, working_dir, &self.script_name);

        debug!(
            interpreter = %launcher.interpreter().display(),
            script = %launcher.script_path().display(),
            deadline_ms = ?self.deadline.map(|d| d.as_millis() as u64),
            "Neural predictor configured"
        );

        Ok(NeuralPredictor {
            launcher,
            deadline: self.deadline,
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink::default())),
            metrics: PredictorMetrics::new(),
        })
    }
}

impl Default for NeuralPredictorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
