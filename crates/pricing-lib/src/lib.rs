//! Core library for house price prediction
//!
//! This crate provides:
//! - Dataset loading from the house CSV table
//! - In-process estimators (gradient descent, boosted decision trees)
//! - The external neural-network predictor invoked as a child process
//! - Diagnostics and Prometheus metrics

pub mod dataset;
pub mod diagnostics;
pub mod estimators;
pub mod models;
pub mod neural;
pub mod observability;

pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink, RecordingSink, RelayTarget, TracingSink};
pub use models::*;
pub use observability::PredictorMetrics;
