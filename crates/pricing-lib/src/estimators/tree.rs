//! Gradient-boosted regression trees
//!
//! Backed by the `gbdt` crate with squared-error loss. Each round fits a
//! depth-limited tree to the current residuals and adds it with shrinkage.

use super::Regressor;
use crate::models::EstimatorKind;
use anyhow::{bail, Result};
use gbdt::config::Config;
use gbdt::decision_tree::{Data, DataVec, ValueType};
use gbdt::gradient_boost::GBDT;
use ndarray::{ArrayView1, ArrayView2};
use tracing::debug;

/// Loss name understood by `gbdt`
const SQUARED_ERROR: &str = "SquaredError";

/// Hyperparameters for [`BoostedTreeRegressor`]
#[derive(Debug, Clone)]
pub struct BoostedTreeConfig {
    pub n_trees: usize,
    pub learning_rate: f64,
    pub max_depth: u32,
    pub min_samples_leaf: usize,
}

impl Default for BoostedTreeConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_leaf: 2,
        }
    }
}

impl BoostedTreeConfig {
    fn to_gbdt(&self, feature_size: usize) -> Config {
        let mut config = Config::new();
        config.set_feature_size(feature_size);
        config.set_max_depth(self.max_depth);
        config.set_iterations(self.n_trees);
        config.set_shrinkage(self.learning_rate as ValueType);
        config.set_min_leaf_size(self.min_samples_leaf);
        config.set_loss(SQUARED_ERROR);
        config.set_data_sample_ratio(1.0);
        config.set_feature_sample_ratio(1.0);
        config.set_debug(false);
        config
    }
}

fn to_features(row: ArrayView1<f64>) -> Vec<ValueType> {
    row.iter().map(|v| *v as ValueType).collect()
}

/// Boosted ensemble of regression trees
pub struct BoostedTreeRegressor {
    config: BoostedTreeConfig,
    model: Option<GBDT>,
}

impl BoostedTreeRegressor {
    pub fn new(config: BoostedTreeConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }
}

impl Default for BoostedTreeRegressor {
    fn default() -> Self {
        Self::new(BoostedTreeConfig::default())
    }
}

impl Regressor for BoostedTreeRegressor {
    fn kind(&self) -> EstimatorKind {
        EstimatorKind::DecisionTree
    }

    fn fit(&mut self, features: ArrayView2<f64>, targets: ArrayView1<f64>) -> Result<()> {
        let n = features.nrows();
        if n == 0 || n != targets.len() {
            bail!("Feature rows ({}) and targets ({}) must be non-empty and equal", n, targets.len());
        }
        if self.config.min_samples_leaf == 0 || self.config.max_depth == 0 {
            bail!("max_depth and min_samples_leaf must be at least 1");
        }

        let mut training: DataVec = features
            .rows()
            .into_iter()
            .zip(targets.iter())
            .map(|(row, target)| {
                Data::new_training_data(to_features(row), 1.0, *target as ValueType, None)
            })
            .collect();

        let mut model = GBDT::new(&self.config.to_gbdt(features.ncols()));
        model.fit(&mut training);

        debug!(
            trees = self.config.n_trees,
            max_depth = self.config.max_depth,
            "Tree ensemble fitted"
        );
        self.model = Some(model);
        Ok(())
    }

    fn predict_row(&self, row: ArrayView1<f64>) -> f64 {
        let Some(model) = &self.model else {
            return 0.0;
        };
        let sample: DataVec = vec![Data::new_test_data(to_features(row), None)];
        model
            .predict(&sample)
            .first()
            .map(|p| *p as f64)
            .unwrap_or_default()
    }
}
