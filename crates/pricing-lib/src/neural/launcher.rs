//! Child process construction
//!
//! Resolves the interpreter once, fixes the script path and working
//! directory, and turns a [`PredictionRequest`] into a spawned child with
//! captured output streams.

use super::error::InvocationError;
use crate::models::PredictionRequest;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::debug;

/// Environment variable consulted when no explicit interpreter is given
pub const PYTHON_ENV_VAR: &str = "HPP_PYTHON";

/// Interpreter used when neither an override nor the environment names one
pub const DEFAULT_PYTHON: &str = "python3";

/// File name of the neural-network script inside the working directory
pub const DEFAULT_SCRIPT_NAME: &str = "HousePriceNeuralNetwork.py";

/// Environment overrides layered on top of the inherited environment.
/// They quiet TensorFlow and keep the child's text I/O ASCII.
pub const CHILD_ENV: [(&str, &str); 3] = [
    ("TF_CPP_MIN_LOG_LEVEL", "3"),
    ("TF_ENABLE_ONEDNN_OPTS", "0"),
    ("PYTHONIOENCODING", "ascii"),
];

/// Resolve the interpreter: explicit override, then `HPP_PYTHON`, then `python3`
pub fn resolve_interpreter(explicit: Option<&str>) -> PathBuf {
    resolve_interpreter_with(explicit, |key| std::env::var(key).ok())
}

/// Same as [`resolve_interpreter`] with an injectable environment lookup
pub fn resolve_interpreter_with<F>(explicit: Option<&str>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    match lookup(PYTHON_ENV_VAR) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_PYTHON),
    }
}

/// Builds child invocations from immutable configuration
#[derive(Debug, Clone)]
pub struct Launcher {
    interpreter: PathBuf,
    script_path: PathBuf,
    working_dir: PathBuf,
}

impl Launcher {
    pub fn new(interpreter: impl Into<PathBuf>, working_dir: impl Into<PathBuf>, script_name: &str) -> Self {
        let working_dir = working_dir.into();
        Self {
            interpreter: interpreter.into(),
            script_path: working_dir.join(script_name),
            working_dir,
        }
    }

    pub fn interpreter(&self) -> &Path {
        &self.interpreter
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Positional arguments: script path, size, bedrooms, zip code.
    ///
    /// Arguments go to the child verbatim, never through a shell, so a
    /// script path containing spaces needs no quoting.
    pub fn arguments(&self, request: &PredictionRequest) -> Vec<OsString> {
        vec![
            self.script_path.clone().into_os_string(),
            OsString::from(request.size.to_string()),
            OsString::from(request.bedrooms.to_string()),
            OsString::from(request.zip_code.as_str()),
        ]
    }

    /// Build the command without starting it
    pub fn command(&self, request: &PredictionRequest) -> Command {
        let mut command = Command::new(&self.interpreter);
        command
            .args(self.arguments(request))
            .current_dir(&self.working_dir)
            .envs(CHILD_ENV)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }

    /// Start the child process
    pub fn spawn(&self, request: &PredictionRequest) -> Result<Child, InvocationError> {
        let child = self
            .command(request)
            .spawn()
            .map_err(|source| InvocationError::ProcessLaunchFailure {
                interpreter: self.interpreter.display().to_string(),
                source,
            })?;

        debug!(
            event = "child_spawned",
            pid = ?child.id(),
            interpreter = %self.interpreter.display(),
            script = %self.script_path.display(),
            "Started predictor process"
        );
        Ok(child)
    }
}
