//! Shared integration-test harness for spawning the preflight binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Helpers for spawning the compiled `preflight` binary.
pub struct PreflightProcess;

impl PreflightProcess {
    /// Runs the binary with the given arguments and waits for completion.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_command(args: &[&str]) -> Output {
        let bin = env!("CARGO_BIN_EXE_preflight");
        Command::new(bin)
            .args(args)
            .output()
            .expect("failed to spawn preflight")
    }

    /// Like [`spawn_command`](Self::spawn_command) with a working directory.
    #[allow(clippy::missing_panics_doc)]
    pub fn spawn_in(dir: &Path, args: &[&str]) -> Output {
        let bin = env!("CARGO_BIN_EXE_preflight");
        Command::new(bin)
            .args(args)
            .current_dir(dir)
            .output()
            .expect("failed to spawn preflight")
    }

    /// Returns the path to a test fixture.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Returns the fixtures directory, used as `--project` in run tests.
    #[must_use]
    pub fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
    }

    /// Extracts the confirmation lines (`... OK (...)`) from stdout.
    #[must_use]
    pub fn confirmations(stdout: &str) -> Vec<String> {
        stdout
            .lines()
            .filter(|l| l.contains(" OK ("))
            .map(ToString::to_string)
            .collect()
    }
}
