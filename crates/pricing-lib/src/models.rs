//! Core data models for house price prediction

use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the house dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseRecord {
    pub size: f64,
    pub bedrooms: f64,
    pub price: f64,
    pub zip_code: String,
}

/// Input features for a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub size: f64,
    pub bedrooms: i32,
    pub zip_code: String,
}

impl PredictionRequest {
    pub fn new(size: f64, bedrooms: i32, zip_code: impl Into<String>) -> Self {
        Self {
            size,
            bedrooms,
            zip_code: zip_code.into(),
        }
    }
}

/// Typed result reported by the external neural-network predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub r2: f64,
    pub mae: f64,
}

/// Which estimator produced a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    GradientDescent,
    DecisionTree,
    NeuralNetwork,
}

impl EstimatorKind {
    /// Human readable title used in console output
    pub fn title(&self) -> &'static str {
        match self {
            EstimatorKind::GradientDescent => "Gradient Descent",
            EstimatorKind::DecisionTree => "Decision Tree",
            EstimatorKind::NeuralNetwork => "Neural Network",
        }
    }

    /// Short label used for metrics and logs
    pub fn label(&self) -> &'static str {
        match self {
            EstimatorKind::GradientDescent => "gradient_descent",
            EstimatorKind::DecisionTree => "decision_tree",
            EstimatorKind::NeuralNetwork => "neural_network",
        }
    }
}

impl fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Evaluation metrics plus the sample prediction of one estimator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatorReport {
    pub estimator: EstimatorKind,
    pub r_squared: f64,
    pub mae: f64,
    pub predicted_price: f64,
    pub generated_at: i64,
}

impl EstimatorReport {
    pub fn new(estimator: EstimatorKind, r_squared: f64, mae: f64, predicted_price: f64) -> Self {
        Self {
            estimator,
            r_squared,
            mae,
            predicted_price,
            generated_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Wrap a neural-network result so it can be listed next to in-process reports
    pub fn from_neural(result: &PredictionResult) -> Self {
        Self::new(
            EstimatorKind::NeuralNetwork,
            result.r2,
            result.mae,
            result.predicted_price,
        )
    }
}
