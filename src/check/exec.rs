//! Child-process execution shared by all checks.
//!
//! Checks run their underlying tools with inherited stdout/stderr so the
//! tool's own diagnostics surface verbatim; the harness never reformats or
//! summarizes them. Each child runs to its natural completion, with no
//! timeouts.

use std::path::Path;
use std::process::{ExitStatus, Stdio};

use tracing::debug;

use crate::error::{CheckError, ExitCode};

/// Spawns a command and waits for it to finish, returning its exit status.
///
/// # Errors
///
/// Returns [`CheckError::SpawnFailed`] when the argv is empty, the program
/// cannot be started, or waiting on the child fails.
pub async fn spawn_status(
    check: &str,
    argv: &[String],
    cwd: &Path,
) -> Result<ExitStatus, CheckError> {
    let (program, args) = argv.split_first().ok_or_else(|| CheckError::SpawnFailed {
        check: check.to_string(),
        command: String::new(),
        message: "empty command".to_string(),
    })?;

    debug!(
        check,
        command = %shlex::try_join(argv.iter().map(String::as_str)).unwrap_or_else(|_| argv.join(" ")),
        cwd = %cwd.display(),
        "spawning child process"
    );

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .spawn()
        .map_err(|e| CheckError::SpawnFailed {
            check: check.to_string(),
            command: program.clone(),
            message: e.to_string(),
        })?;

    child.wait().await.map_err(|e| CheckError::SpawnFailed {
        check: check.to_string(),
        command: program.clone(),
        message: e.to_string(),
    })
}

/// Runs one fail-fast pipeline step.
///
/// # Errors
///
/// Returns [`CheckError::StepFailed`] carrying the child's exit code when
/// the command exits non-zero. A child killed by a signal has no exit code
/// and maps to the generic error code.
pub async fn run_step(check: &str, argv: &[String], cwd: &Path) -> Result<(), CheckError> {
    let status = spawn_status(check, argv, cwd).await?;
    if status.success() {
        Ok(())
    } else {
        Err(CheckError::StepFailed {
            check: check.to_string(),
            code: status.code().unwrap_or(ExitCode::ERROR),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
