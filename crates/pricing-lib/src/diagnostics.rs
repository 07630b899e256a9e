//! Diagnostic reporting for the external predictor
//!
//! Every failure of a child invocation, every byte the child writes to
//! stderr, and the free text it prints ahead of its result payload pass
//! through a [`DiagnosticSink`]. Sinks never fail and never block callers.

use std::sync::Mutex;
use tracing::{error, info, warn};

/// Classification of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A failure in launching, collecting, extracting or validating
    Error,
    /// Raw text the child wrote to its stderr
    RawStderr,
}

/// A recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Operator-visible sink for predictor diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// Report a failure cause or child stderr text
    fn report(&self, kind: DiagnosticKind, message: &str);

    /// Pass through incidental text printed by the child (e.g. training metrics)
    fn relay(&self, text: &str);
}

/// Where relayed child text ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayTarget {
    /// The caller's standard output
    #[default]
    Stdout,
    /// An info-level log event (stdout is reserved for machine output)
    Log,
}

/// Sink that turns diagnostics into structured tracing events
#[derive(Debug, Clone, Default)]
pub struct TracingSink {
    relay_target: RelayTarget,
}

impl TracingSink {
    pub fn new(relay_target: RelayTarget) -> Self {
        Self { relay_target }
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, kind: DiagnosticKind, message: &str) {
        match kind {
            DiagnosticKind::Error => {
                error!(
                    event = "neural_predictor_error",
                    error = %message,
                    "Neural network predictor failed"
                );
            }
            DiagnosticKind::RawStderr => {
                warn!(
                    event = "child_stderr",
                    stderr = %message,
                    "Predictor script wrote to stderr"
                );
            }
        }
    }

    fn relay(&self, text: &str) {
        match self.relay_target {
            RelayTarget::Stdout => println!("{}", text),
            RelayTarget::Log => info!(event = "child_output", output = %text, "Predictor script output"),
        }
    }
}

/// Sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    relayed: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of reported diagnostics, oldest first
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.diagnostics.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Messages of the given kind only
    pub fn messages(&self, kind: DiagnosticKind) -> Vec<String> {
        self.diagnostics()
            .into_iter()
            .filter(|d| d.kind == kind)
            .map(|d| d.message)
            .collect()
    }

    /// Snapshot of relayed text, oldest first
    pub fn relayed(&self) -> Vec<String> {
        match self.relayed.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, kind: DiagnosticKind, message: &str) {
        let entry = Diagnostic {
            kind,
            message: message.to_string(),
        };
        match self.diagnostics.lock() {
            Ok(mut guard) => guard.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }

    fn relay(&self, text: &str) {
        match self.relayed.lock() {
            Ok(mut guard) => guard.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order_and_kind() {
        let sink = RecordingSink::new();
        sink.report(DiagnosticKind::RawStderr, "warning: slow");
        sink.report(DiagnosticKind::Error, "boom");
        sink.relay("R^2: 0.9");

        assert_eq!(sink.diagnostics().len(), 2);
        assert_eq!(sink.messages(DiagnosticKind::Error), vec!["boom".to_string()]);
        assert_eq!(sink.messages(DiagnosticKind::RawStderr), vec!["warning: slow".to_string()]);
        assert_eq!(sink.relayed(), vec!["R^2: 0.9".to_string()]);
    }

    #[test]
    fn test_tracing_sink_never_panics() {
        let sink = TracingSink::new(RelayTarget::Log);
        sink.report(DiagnosticKind::Error, "no subscriber installed");
        sink.report(DiagnosticKind::RawStderr, "");
        sink.relay("text");
    }
}
