//! Environment preparer.
//!
//! Installs the project's declared dependencies: upgrades the package
//! installer itself, then installs everything in the manifest. Both
//! sub-steps are fail-fast; the installer mutates the local package
//! environment and is expected to be idempotent across repeated runs.

use async_trait::async_trait;
use tracing::info;

use crate::check::{Check, CheckContext, CheckKind, CheckReport, exec};
use crate::config::loader::ResolvedEnvironment;
use crate::error::CheckError;

/// Dependency installation check.
#[derive(Debug)]
pub struct InstallCheck {
    installer: Vec<String>,
    manifest: std::path::PathBuf,
    self_upgrade: bool,
    upgrade_package: String,
}

impl InstallCheck {
    /// Builds the check from resolved environment settings.
    #[must_use]
    pub fn new(env: &ResolvedEnvironment) -> Self {
        Self {
            installer: env.installer.clone(),
            manifest: env.manifest.clone(),
            self_upgrade: env.self_upgrade,
            upgrade_package: env.upgrade_package.clone(),
        }
    }

    fn upgrade_argv(&self) -> Vec<String> {
        let mut argv = self.installer.clone();
        argv.extend(
            ["install", "--upgrade", self.upgrade_package.as_str()]
                .into_iter()
                .map(String::from),
        );
        argv
    }

    fn install_argv(&self) -> Vec<String> {
        let mut argv = self.installer.clone();
        argv.push("install".to_string());
        argv.push("-r".to_string());
        argv.push(self.manifest.display().to_string());
        argv
    }
}

#[async_trait]
impl Check for InstallCheck {
    fn name(&self) -> &str {
        "prepare environment"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Environment
    }

    async fn run(&self, ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        if self.self_upgrade {
            info!(package = %self.upgrade_package, "upgrading installer");
            exec::run_step(self.name(), &self.upgrade_argv(), &ctx.project_root).await?;
        }

        info!(manifest = %self.manifest.display(), "installing dependencies");
        exec::run_step(self.name(), &self.install_argv(), &ctx.project_root).await?;

        Ok(CheckReport {
            confirmations: vec![format!(
                "dependencies from {} installed",
                self.manifest.display()
            )],
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
