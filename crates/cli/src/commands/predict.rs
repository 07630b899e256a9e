//! `hpp predict`: run the selected estimators for one house

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use pricing_lib::dataset::Dataset;
use pricing_lib::estimators::{regressor_for, train_and_evaluate};
use pricing_lib::{
    DiagnosticSink, EstimatorKind, EstimatorReport, PredictionRequest, RelayTarget, TracingSink,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::output::{
    format_currency, format_thousands, print_json, print_table, OutputFormat, ReportRow,
};

/// Which estimators to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ModelSelection {
    /// Every estimator, in-process first
    #[default]
    All,
    GradientDescent,
    DecisionTree,
    NeuralNetwork,
}

impl ModelSelection {
    /// Estimators to run, in execution order
    pub fn kinds(&self) -> Vec<EstimatorKind> {
        match self {
            ModelSelection::All => vec![
                EstimatorKind::GradientDescent,
                EstimatorKind::DecisionTree,
                EstimatorKind::NeuralNetwork,
            ],
            ModelSelection::GradientDescent => vec![EstimatorKind::GradientDescent],
            ModelSelection::DecisionTree => vec![EstimatorKind::DecisionTree],
            ModelSelection::NeuralNetwork => vec![EstimatorKind::NeuralNetwork],
        }
    }
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// House size in square feet
    #[arg(long, default_value_t = 2000.0)]
    pub size: f64,

    /// Number of bedrooms
    #[arg(long, default_value_t = 3)]
    pub bedrooms: i32,

    /// Zip code
    #[arg(long, default_value = "12345")]
    pub zip_code: String,

    /// Estimators to run
    #[arg(long, short, value_enum, default_value_t = ModelSelection::All)]
    pub model: ModelSelection,

    /// House dataset CSV (overrides `data_path`)
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Python interpreter for the neural network script
    #[arg(long)]
    pub python: Option<String>,

    /// Kill the neural network script after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl PredictArgs {
    fn request(&self) -> PredictionRequest {
        PredictionRequest::new(self.size, self.bedrooms, self.zip_code.as_str())
    }
}

/// Run the selected estimators and print their results
pub async fn run_predict(args: PredictArgs, config: AppConfig, format: OutputFormat) -> Result<()> {
    let config = config.with_overrides(args.data.clone(), args.python.clone(), args.timeout);
    let request = args.request();
    let kinds = args.model.kinds();
    let mut reports = Vec::with_capacity(kinds.len());

    let regressors: Vec<_> = kinds.iter().filter_map(|kind| regressor_for(*kind)).collect();
    if !regressors.is_empty() {
        let dataset = Dataset::load(&config.data_path)?;
        info!(
            event = "dataset_loaded",
            path = %config.data_path.display(),
            rows = dataset.len(),
            "Loaded house dataset"
        );

        for mut regressor in regressors {
            let report = train_and_evaluate(regressor.as_mut(), &dataset, &request)?;
            if format == OutputFormat::Table {
                print_estimator(&report);
            }
            reports.push(report);
        }
    }

    if kinds.contains(&EstimatorKind::NeuralNetwork) {
        let relay_target = match format {
            OutputFormat::Table => RelayTarget::Stdout,
            OutputFormat::Json => RelayTarget::Log,
        };
        let sink: Arc<dyn DiagnosticSink> = Arc::new(TracingSink::new(relay_target));
        let predictor = config
            .predictor_builder()
            .sink(sink)
            .build()
            .context("Failed to configure neural network predictor")?;

        match predictor.predict(&request).await {
            Some(result) => {
                if format == OutputFormat::Table {
                    println!("Predicted Price: {}", format_currency(result.predicted_price));
                }
                reports.push(EstimatorReport::from_neural(&result));
            }
            None => debug!("Neural network produced no result"),
        }
    }

    match format {
        OutputFormat::Table => {
            println!();
            println!("{}", "Summary".bold());
            let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from).collect();
            print_table(&rows);
        }
        OutputFormat::Json => print_json(&reports)?,
    }

    Ok(())
}

fn print_estimator(report: &EstimatorReport) {
    println!("=== {} Results ===", report.estimator.title());
    println!(
        "R^2: {}, MAE: {}",
        report.r_squared,
        format_thousands(report.mae, 2)
    );
    println!(
        "Predicted price for house: {}\n",
        format_currency(report.predicted_price)
    );
}
