//! `hpp config`: show the effective configuration

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use crate::config::{user_config_path, AppConfig, LOCAL_CONFIG_FILE};
use crate::output::{print_info, print_json, OutputFormat};

#[derive(Serialize)]
struct EffectiveConfig<'a> {
    #[serde(flatten)]
    config: &'a AppConfig,
    resolved_interpreter: PathBuf,
    script_path: PathBuf,
}

/// Print the merged configuration plus what it resolves to
pub fn show_config(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let predictor = config
        .predictor_builder()
        .build()
        .context("Failed to resolve neural network predictor settings")?;

    let effective = EffectiveConfig {
        config,
        resolved_interpreter: predictor.interpreter().to_path_buf(),
        script_path: predictor.script_path().to_path_buf(),
    };

    match format {
        OutputFormat::Json => print_json(&effective)?,
        OutputFormat::Table => {
            println!("{}", "Effective Configuration".bold());
            println!("{}", "=".repeat(50));
            println!("Data path:              {}", config.data_path.display());
            println!("Script name:            {}", config.script_name);
            println!(
                "Python override:        {}",
                config.python.as_deref().unwrap_or("-")
            );
            println!(
                "Timeout:                {}",
                config
                    .timeout()
                    .map(|t| format!("{}s", t.as_secs()))
                    .unwrap_or_else(|| "none".to_string())
            );
            println!();
            println!(
                "Interpreter:            {}",
                effective.resolved_interpreter.display().to_string().cyan()
            );
            println!(
                "Script path:            {}",
                effective.script_path.display().to_string().cyan()
            );
            println!();

            let user = user_config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(no home directory)".to_string());
            print_info(&format!("Config files: {}, ./{}", user, LOCAL_CONFIG_FILE));
        }
    }

    Ok(())
}
