//! CLI integration tests

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn hpp(args: &[&str], envs: &[(&str, &Path)]) -> Output {
    let mut command = Command::new("cargo");
    command.args(["run", "-q", "-p", "hpp-cli", "--"]).args(args);
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("Failed to execute command")
}

/// Scratch directory holding a fake predictor script run by `sh`
fn script_dir(body: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("HousePriceNeuralNetwork.py"), body).unwrap();
    dir
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = hpp(&["--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("House Price Predictor"), "Should show app name");
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("config"), "Should show config command");
    assert!(stdout.contains("--format"), "Should show format option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = hpp(&["--version"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("hpp"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = hpp(&["predict", "--help"], &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    for flag in ["--size", "--bedrooms", "--zip-code", "--model", "--data", "--python", "--timeout"] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
    assert!(stdout.contains("neural-network"), "Should list model names");
}

/// Test invalid model name
#[test]
fn test_invalid_model() {
    let output = hpp(&["predict", "--model", "fast-tree"], &[]);
    assert!(!output.status.success(), "Unknown model should fail");
}

/// Test neural network relay and result line
#[cfg(unix)]
#[test]
fn test_predict_neural_network_table() {
    let dir = script_dir(
        r#"printf 'R^2: 0.91\nMAE: 15320\n{"predicted_price": 452000, "r2": 0.91, "mae": 15320}'"#,
    );
    let output = hpp(
        &["predict", "--model", "neural-network", "--python", "sh"],
        &[("HPP_WORKING_DIR", dir.path())],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict should succeed");
    assert!(stdout.contains("R^2: 0.91\nMAE: 15320"), "Should relay preamble");
    assert!(
        stdout.contains("Predicted Price: $452,000.00"),
        "Should print predicted price"
    );
}

/// Test that a failing script does not fail the command
#[cfg(unix)]
#[test]
fn test_predict_neural_network_failure_exits_zero() {
    let dir = script_dir(r#"echo '{"error": "model not trained"}'"#);
    let output = hpp(
        &["--format", "json", "predict", "--model", "neural-network", "--python", "sh"],
        &[("HPP_WORKING_DIR", dir.path())],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(output.status.success(), "Predict should still succeed");
    assert_eq!(stdout.trim(), "[]", "No reports expected");
    assert!(stderr.contains("model not trained"), "Should log the child error");
}

/// Test in-process estimator JSON output
#[test]
fn test_predict_gradient_descent_json() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("houses.csv");
    let mut csv = String::from("Size,Bedrooms,Price,ZipCode\n");
    for i in 0..20 {
        let size = 1000 + i * 100;
        let bedrooms = 1 + i % 4;
        csv.push_str(&format!("{},{},{},12345\n", size, bedrooms, size * 150 + bedrooms * 5000));
    }
    std::fs::write(&data, csv).unwrap();

    let output = hpp(
        &[
            "predict",
            "--model",
            "gradient-descent",
            "--data",
            data.to_str().unwrap(),
            "--format",
            "json",
        ],
        &[],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict should succeed");
    let reports: serde_json::Value = serde_json::from_str(&stdout).expect("Should print JSON");
    let reports = reports.as_array().expect("Should be an array");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["estimator"], "gradient_descent");
    assert!(reports[0]["r_squared"].as_f64().unwrap() > 0.9);
}

/// Test that a missing dataset fails the command
#[test]
fn test_predict_missing_dataset() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.csv");
    let output = hpp(
        &["predict", "--model", "decision-tree", "--data", missing.to_str().unwrap()],
        &[],
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Missing dataset should fail");
    assert!(stderr.contains("missing.csv"), "Should name the dataset");
}

/// Test config output
#[test]
fn test_config_json() {
    let dir = TempDir::new().unwrap();
    let output = hpp(
        &["config", "--format", "json"],
        &[("HPP_WORKING_DIR", dir.path())],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Config should succeed");
    let config: serde_json::Value = serde_json::from_str(&stdout).expect("Should print JSON");
    let script_path = config["script_path"].as_str().unwrap();
    assert!(script_path.ends_with("HousePriceNeuralNetwork.py"));
    assert!(script_path.starts_with(dir.path().to_str().unwrap()));
    assert!(config["resolved_interpreter"].is_string());
}
