//! L2-regularized linear regression
//!
//! Fit by coordinate descent through `linfa-elasticnet` with the L1 share
//! set to zero. Targets are standardized before fitting and restored on
//! prediction, so the convergence tolerance does not depend on the price
//! scale.

use super::Regressor;
use crate::models::EstimatorKind;
use anyhow::{bail, Context, Result};
use linfa::traits::Fit;
use linfa_elasticnet::ElasticNet;
use ndarray::{ArrayView1, ArrayView2};
use tracing::debug;

/// Hyperparameters for [`RidgeRegressor`]
#[derive(Debug, Clone)]
pub struct LinearRegressionConfig {
    /// L2 penalty, scaled by 1/n like a per-example regularizer
    pub l2_regularization: f64,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for LinearRegressionConfig {
    fn default() -> Self {
        Self {
            l2_regularization: 0.1,
            max_iterations: 5000,
            tolerance: 1e-8,
        }
    }
}

struct FittedModel {
    model: Option<ElasticNet<f64>>,
    target_mean: f64,
    target_std: f64,
}

pub struct RidgeRegressor {
    config: LinearRegressionConfig,
    fitted: Option<FittedModel>,
}

impl RidgeRegressor {
    pub fn new(config: LinearRegressionConfig) -> Self {
        Self {
            config,
            fitted: None,
        }
    }
}

impl Default for RidgeRegressor {
    fn default() -> Self {
        Self::new(LinearRegressionConfig::default())
    }
}

impl Regressor for RidgeRegressor {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::GradientDescent
    }

    fn fit(&mut self, features: ArrayView2<f64>, targets: ArrayView1<f64>) -> Result<()> {
        let n = features.nrows();
        if n == 0 || n != targets.len() {
            bail!("Feature rows ({}) and targets ({}) must be non-empty and equal", n, targets.len());
        }

        let target_mean = targets.sum() / n as f64;
        let target_std = (targets.mapv(|y| (y - target_mean).powi(2)).sum() / n as f64).sqrt();

        // A constant target needs no model: the mean is exact
        if target_std < f64::EPSILON {
            self.fitted = Some(FittedModel {
                model: None,
                target_mean,
                target_std: 1.0,
            });
            return Ok(());
        }

        let scaled = targets.mapv(|y| (y - target_mean) / target_std);
        let dataset = linfa::Dataset::new(features.to_owned(), scaled);
        let model = ElasticNet::params()
            .penalty(self.config.l2_regularization / n as f64)
            .l1_ratio(0.0)
            .with_intercept(true)
            .max_iterations(self.config.max_iterations)
            .tolerance(self.config.tolerance)
            .fit(&dataset)
            .context("Failed to fit linear model")?;

        debug!(
            features = features.ncols(),
            intercept = model.intercept(),
            "Linear model fitted"
        );
        self.fitted = Some(FittedModel {
            model: Some(model),
            target_mean,
            target_std,
        });
        Ok(())
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let Some(fitted) = &self.fitted else {
            return 0.0;
        };
        let scaled = match &fitted.model {
            Some(model) => row.dot(model.hyperplane()) + model.intercept(),
            None => 0.0,
        };
        scaled * fitted.target_std + fitted.target_mean
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    fn line_data() -> (Array2<f64>, Array1<f64>) {
        let xs: Vec<f64> = (0..=20).map(|i| i as f64 / 20.0).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 2.0).collect();
        (Array2::from_shape_vec((xs.len(), 1), xs).unwrap(), Array1::from(ys))
    }

    #[test]
    fn test_recovers_line_with_negligible_penalty() {
        let (x, y) = line_data();
        let mut model = RidgeRegressor::new(LinearRegressionConfig {
            l2_regularization: 1e-9,
            ..Default::default()
        });
        model.fit(x.view(), y.view()).unwrap();

        let at = |v: f64| model.predict_row(Array1::from(vec![v]).view());
        assert!((at(0.0) - 2.0).abs() < 0.01, "got {}", at(0.0));
        assert!((at(1.0) - 5.0).abs() < 0.01, "got {}", at(1.0));
    }

    #[test]
    fn test_penalty_shrinks_but_fits() {
        let (x, y) = line_data();
        let mut model = RidgeRegressor::default();
        model.fit(x.view(), y.view()).unwrap();

        let predictions: Vec<f64> = x.rows().into_iter().map(|r| model.predict_row(r)).collect();
        let r2 = super::super::metrics::r_squared(y.as_slice().unwrap(), &predictions);
        assert!(r2 > 0.95, "r2 was {}", r2);

        // Shrinkage pulls the slope below the true 3.0
        let slope = model.predict_row(Array1::from(vec![1.0]).view())
            - model.predict_row(Array1::from(vec![0.0]).view());
        assert!(slope < 3.0 && slope > 2.5, "slope was {}", slope);
    }

    #[test]
    fn test_constant_target() {
        let x = Array2::from_shape_vec((3, 1), vec![0.0, 0.5, 1.0]).unwrap();
        let y = Array1::from(vec![7.0, 7.0, 7.0]);
        let mut model = RidgeRegressor::default();
        model.fit(x.view(), y.view()).unwrap();
        assert!((model.predict_row(x.row(1)) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_mismatched_input() {
        let x = Array2::<f64>::zeros((3, 1));
        let y = Array1::from(vec![1.0, 2.0]);
        assert!(RidgeRegressor::default().fit(x.view(), y.view()).is_err());
    }
}
