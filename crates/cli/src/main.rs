//! House Price Predictor CLI
//!
//! Trains the in-process estimators on the house dataset, runs the external
//! neural network script and prints what each one predicts for a house.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::predict::{self, PredictArgs};
use output::{LogFormat, OutputFormat};
use pricing_lib::PredictorMetrics;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// House Price Predictor CLI
#[derive(Parser)]
#[command(name = "hpp")]
#[command(author, version, about = "House Price Predictor", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log line format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Dump Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the price of a house with every selected estimator
    Predict(PredictArgs),

    /// Show the effective configuration
    Config,
}

fn init_tracing(verbose: bool, log_format: LogFormat) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::AppConfig::load()?;

    match cli.command {
        Commands::Predict(args) => predict::run_predict(args, config, cli.format).await?,
        Commands::Config => commands::config::show_config(&config, cli.format)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let dump_metrics = cli.metrics;
    let outcome = run(cli).await;

    if dump_metrics {
        match PredictorMetrics::new().render() {
            Ok(text) => eprint!("{}", text),
            Err(err) => output::print_warning(&format!("Failed to render metrics: {:#}", err)),
        }
    }

    if let Err(err) = outcome {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
