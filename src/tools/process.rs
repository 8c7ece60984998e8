//! Shared subprocess invocation for the external tools.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Debug)]
pub struct ToolOutput {
    pub stdout: String,
}

/// Run an external command to completion, capturing output.
///
/// A non-zero exit becomes an error carrying the first stderr line. Each
/// external call is attempted exactly once and awaited with no timeout.
pub fn run(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<ToolOutput> {
    let start = Instant::now();
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    tracing::debug!(program, ?args, "spawn external command");
    let output = cmd
        .output()
        .with_context(|| format!("spawn {program}"))?;
    let elapsed_ms = start.elapsed().as_millis();
    tracing::info!(
        program,
        elapsed_ms,
        exit = output.status.code(),
        "external command complete"
    );

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        let first = stderr.trim().lines().next().unwrap_or_default();
        let detail = if first.is_empty() {
            format!("status {}", output.status)
        } else {
            first.to_string()
        };
        return Err(anyhow!("{program} failed: {detail}"));
    }
    Ok(ToolOutput { stdout })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_available() -> bool {
        which::which("sh").is_ok()
    }

    #[test]
    fn captures_stdout_on_success() {
        if !shell_available() {
            return;
        }
        let out = run("sh", &["-c", "echo hi"], None).unwrap();
        assert_eq!(out.stdout, "hi\n");
    }

    #[test]
    fn failure_carries_the_first_stderr_line() {
        if !shell_available() {
            return;
        }
        let err = run("sh", &["-c", "echo oops >&2; echo later >&2; exit 3"], None)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("oops"), "message was {message:?}");
        assert!(!message.contains("later"));
    }

    #[test]
    fn missing_binary_is_a_spawn_error() {
        let err = run("siteup-no-such-tool", &[], None).unwrap_err();
        assert!(format!("{err:#}").contains("spawn"));
    }
}
