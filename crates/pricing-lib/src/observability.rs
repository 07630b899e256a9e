//! Prometheus metrics for the predictors
//!
//! Tracks child invocation latency and outcomes plus in-process training time.

use anyhow::{Context, Result};
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Encoder, Histogram,
    HistogramVec, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Latency buckets in seconds. Child runs train a network, so they go up to minutes.
const LATENCY_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0];

/// Outcome label for a successful child invocation
pub const OUTCOME_SUCCESS: &str = "success";

static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    child_invocation_seconds: Histogram,
    child_invocations_total: IntCounterVec,
    training_seconds: HistogramVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            child_invocation_seconds: register_histogram!(
                "hpp_child_invocation_seconds",
                "Wall time of one neural predictor child process, spawn to exit",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register child_invocation_seconds"),

            child_invocations_total: register_int_counter_vec!(
                "hpp_child_invocations_total",
                "Neural predictor invocations by outcome",
                &["outcome"]
            )
            .expect("Failed to register child_invocations_total"),

            training_seconds: register_histogram_vec!(
                "hpp_training_seconds",
                "Time spent fitting and evaluating an in-process estimator",
                &["estimator"],
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register training_seconds"),
        }
    }
}

/// Handle to the global metrics; clones share the same instruments
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new)
    }

    /// Record how long a child process ran
    pub fn observe_child_latency(&self, duration_secs: f64) {
        self.inner().child_invocation_seconds.observe(duration_secs);
    }

    /// Count one invocation outcome (`success` or an error kind)
    pub fn inc_child_outcome(&self, outcome: &str) {
        self.inner()
            .child_invocations_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Current count for an outcome
    pub fn child_outcome_count(&self, outcome: &str) -> u64 {
        self.inner()
            .child_invocations_total
            .with_label_values(&[outcome])
            .get()
    }

    /// Record fit + evaluation time of an in-process estimator
    pub fn observe_training(&self, estimator: &str, duration_secs: f64) {
        self.inner()
            .training_seconds
            .with_label_values(&[estimator])
            .observe(duration_secs);
    }

    /// Render every registered metric in the Prometheus text format
    pub fn render(&self) -> Result<String> {
        let families = prometheus::gather();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .context("Failed to encode metrics")?;
        String::from_utf8(buffer).context("Metrics exposition is not valid UTF-8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_counter_increments() {
        let metrics = PredictorMetrics::new();
        let before = metrics.child_outcome_count("test_outcome");
        metrics.inc_child_outcome("test_outcome");
        metrics.inc_child_outcome("test_outcome");
        assert_eq!(metrics.child_outcome_count("test_outcome"), before + 2);
    }

    #[test]
    fn test_render_contains_metric_names() {
        let metrics = PredictorMetrics::new();
        metrics.observe_child_latency(0.2);
        metrics.observe_training("gradient_descent", 0.01);
        metrics.inc_child_outcome(OUTCOME_SUCCESS);

        let text = metrics.render().unwrap();
        assert!(text.contains("hpp_child_invocation_seconds"));
        assert!(text.contains("hpp_child_invocations_total"));
        assert!(text.contains("hpp_training_seconds"));
    }
}
