//! Draining the child's output streams
//!
//! Both pipes are read to end-of-stream and the exit status is awaited
//! before anything is handed to the extractor.

use super::error::InvocationError;
use std::time::Duration;
use tokio::process::Child;
use tracing::debug;

/// Captured text of one finished child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_observed: bool,
    pub exit_code: Option<i32>,
}

/// Decode bytes as ASCII; anything outside the ASCII range becomes `?`
pub fn decode_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

/// Wait for the child to finish and collect both streams.
///
/// With `deadline` set, a child still running when it expires is killed
/// (the handle is spawned with kill-on-drop) and the call fails with
/// [`InvocationError::DeadlineExceeded`]. Without it the wait is unbounded.
pub async fn collect(child: Child, deadline: Option<Duration>) -> Result<RawProcessOutput, InvocationError> {
    let pid = child.id();
    let output = match deadline {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                debug!(event = "child_deadline", pid = ?pid, limit_ms = limit.as_millis() as u64, "Killing predictor process");
                return Err(InvocationError::DeadlineExceeded(limit));
            }
        },
        None => child.wait_with_output().await?,
    };

    let raw = RawProcessOutput {
        stdout: decode_ascii(&output.stdout),
        stderr: decode_ascii(&output.stderr),
        exit_observed: true,
        exit_code: output.status.code(),
    };

    debug!(
        event = "child_exited",
        pid = ?pid,
        exit_code = ?raw.exit_code,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Predictor process exited"
    );

    Ok(raw)
}
