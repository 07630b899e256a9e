//! In-process estimators
//!
//! Fit a regressor on the encoded house table, score it on the same table
//! and predict the requested house.

mod features;
mod linear;
pub mod metrics;
mod tree;

pub use features::FeatureEncoder;
pub use linear::{LinearRegressionConfig, RidgeRegressor};
pub use metrics::{mean_absolute_error, r_squared};
pub use tree::{BoostedTreeConfig, BoostedTreeRegressor};

use crate::dataset::Dataset;
use crate::models::{EstimatorKind, EstimatorReport, PredictionRequest};
use crate::observability::PredictorMetrics;
use anyhow::{Context, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use std::time::Instant;
use tracing::info;

/// Trait for in-process regression models
pub trait Regressor: Send {
    /// Which estimator this is
    fn kind(&self) -> EstimatorKind;

    /// Fit on encoded features and raw targets
    fn fit(&mut self, features: ArrayView2<f64>, targets: ArrayView1<f64>) -> Result<()>;

    /// Predict one encoded row
    fn predict_row(&self, row: ArrayView1<f64>) -> f64;
}

/// Default-configured regressor for an in-process estimator kind.
/// Returns `None` for the neural network, which runs out of process.
pub fn regressor_for(kind: EstimatorKind) -> Option<Box<dyn Regressor>> {
    match kind {
        EstimatorKind::GradientDescent => Some(Box::new(RidgeRegressor::default())),
        EstimatorKind::DecisionTree => Some(Box::new(BoostedTreeRegressor::default())),
        EstimatorKind::NeuralNetwork => None,
    }
}

/// Encode, fit, evaluate and predict in one pass
pub fn train_and_evaluate(
    regressor: &mut dyn Regressor,
    dataset: &Dataset,
    request: &PredictionRequest,
) -> Result<EstimatorReport> {
    let kind = regressor.kind();
    let start = Instant::now();

    let encoder = FeatureEncoder::fit(dataset)?;
    let features = encoder.transform(dataset);
    let targets = Array1::from(dataset.prices());

    regressor
        .fit(features.view(), targets.view())
        .with_context(|| format!("Failed to train {} model", kind))?;

    let predictions: Vec<f64> = features
        .rows()
        .into_iter()
        .map(|row| regressor.predict_row(row))
        .collect();
    let actual = dataset.prices();
    let r2 = r_squared(&actual, &predictions);
    let mae = mean_absolute_error(&actual, &predictions);

    let predicted_price = regressor.predict_row(encoder.encode_request(request).view());

    let elapsed = start.elapsed();
    PredictorMetrics::new().observe_training(kind.label(), elapsed.as_secs_f64());
    info!(
        event = "estimator_trained",
        estimator = kind.label(),
        rows = dataset.len(),
        features = encoder.width(),
        r2 = r2,
        mae = mae,
        predicted_price = predicted_price,
        elapsed_ms = elapsed.as_millis() as u64,
        "Trained in-process estimator"
    );

    Ok(EstimatorReport::new(kind, r2, mae, predicted_price))
}
