//! The polymorphic check capability.
//!
//! Every pipeline phase (installer, linter, import prober) implements the
//! same run-and-report [`Check`] trait. The runner executes boxed checks in
//! a fixed order and aborts on the first failure; the trait keeps that
//! contract uniform while each variant drives its own external tool.

pub mod exec;
pub mod install;
pub mod lint;
pub mod probe;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::CheckError;

/// Kind discriminator for banners and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// Dependency installation.
    Environment,
    /// Fatal lint pass.
    StrictLint,
    /// Non-fatal lint pass.
    AdvisoryLint,
    /// Import smoke tests.
    LoadCheck,
}

impl CheckKind {
    /// Returns the lowercase identifier used in events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::StrictLint => "strict_lint",
            Self::AdvisoryLint => "advisory_lint",
            Self::LoadCheck => "load_check",
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution context shared by all checks.
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Directory all checks run in and relative paths resolve against.
    pub project_root: PathBuf,
}

/// What a completed check reports.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    /// Confirmation lines, one per verified item. The check prints each
    /// line to stdout as it is verified; the runner reuses them for events.
    pub confirmations: Vec<String>,
}

/// A uniform run-and-report capability over variant implementations.
///
/// Implementations must be side-effect-complete on return: when `run`
/// resolves, the underlying tool has run to its natural completion.
#[async_trait]
pub trait Check: Send + Sync {
    /// Human-readable name, used in banners and error messages.
    fn name(&self) -> &str;

    /// Kind discriminator.
    fn kind(&self) -> CheckKind;

    /// Executes the check to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckError`] on the first failure; the runner aborts the
    /// pipeline and propagates the error's exit code.
    async fn run(&self, ctx: &CheckContext) -> Result<CheckReport, CheckError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_identifiers_are_stable() {
        assert_eq!(CheckKind::Environment.as_str(), "environment");
        assert_eq!(CheckKind::StrictLint.as_str(), "strict_lint");
        assert_eq!(CheckKind::AdvisoryLint.as_str(), "advisory_lint");
        assert_eq!(CheckKind::LoadCheck.as_str(), "load_check");
    }

    #[test]
    fn kind_display_matches_identifier() {
        assert_eq!(CheckKind::LoadCheck.to_string(), "load_check");
    }
}
