//! Configuration management for the CLI
//!
//! Sources are layered lowest to highest: built-in defaults, the user file
//! `~/.config/hpp/config.toml`, `hpp.toml` in the current directory, then
//! `HPP_*` environment variables. Command-line flags are applied on top.

use anyhow::{Context, Result};
use pricing_lib::neural::{NeuralPredictor, NeuralPredictorBuilder, DEFAULT_SCRIPT_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "HPP";

/// Project-local configuration file
pub const LOCAL_CONFIG_FILE: &str = "hpp.toml";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// House dataset for the in-process estimators
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Interpreter override for the neural network script
    #[serde(default)]
    pub python: Option<String>,

    /// Neural network script file name
    #[serde(default = "default_script_name")]
    pub script_name: String,

    /// Directory holding the script; also its working directory
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Kill the script after this many seconds (0 or unset: wait forever)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("VirtualTownHouseDataset.csv")
}

fn default_script_name() -> String {
    DEFAULT_SCRIPT_NAME.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            python: None,
            script_name: default_script_name(),
            working_dir: None,
            timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self> {
        let user_file = user_config_path();
        Self::load_from(
            user_file.as_deref(),
            Path::new(LOCAL_CONFIG_FILE),
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    fn load_from(
        user_file: Option<&Path>,
        local_file: &Path,
        environment: config::Environment,
    ) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = user_file {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let config = builder
            .add_source(config::File::from(local_file).required(false))
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        data_path: Option<PathBuf>,
        python: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if python.is_some() {
            self.python = python;
        }
        if timeout_secs.is_some() {
            self.timeout_secs = timeout_secs;
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Neural predictor builder carrying the configured interpreter, script and deadline
    pub fn predictor_builder(&self) -> NeuralPredictorBuilder {
        let mut builder = NeuralPredictor::builder().script_name(self.script_name.as_str());
        if let Some(python) = &self.python {
            builder = builder.interpreter(python.as_str());
        }
        if let Some(dir) = &self.working_dir {
            builder = builder.working_dir(dir.as_path());
        }
        if let Some(deadline) = self.timeout() {
            builder = builder.deadline(deadline);
        }
        builder
    }
}

/// Get the user configuration file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|home| home.join(".config").join("hpp").join("config.toml"))
}
