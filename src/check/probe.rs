//! Load-check runner.
//!
//! For each target, in fixed order, the configured interpreter runs a small
//! probe program that imports the module and verifies the expected symbol is
//! bound at module scope. This proves loadability (the dependency graph
//! resolves and module-level initialization succeeds), not behavioral
//! correctness.

use async_trait::async_trait;
use tracing::info;

use crate::check::{Check, CheckContext, CheckKind, CheckReport, exec};
use crate::config::loader::ResolvedLoadChecks;
use crate::config::schema::LoadTarget;
use crate::error::{CheckError, ExitCode};

/// Exit code the probe program uses when the module loads but the expected
/// symbol is not bound. Chosen to be distinguishable from the interpreter's
/// own exit code for import failures (1).
pub const MISSING_SYMBOL_EXIT: i32 = 3;

/// Probe program executed by the interpreter.
///
/// Receives the module path and symbol name as arguments. Import and
/// module-level initialization failures surface with the interpreter's own
/// traceback on stderr and exit 1; a missing symbol exits
/// [`MISSING_SYMBOL_EXIT`].
pub const PROBE_PROGRAM: &str = "\
import importlib
import sys

try:
    module = importlib.import_module(sys.argv[1])
except BaseException:
    import traceback
    traceback.print_exc()
    sys.exit(1)

if getattr(module, sys.argv[2], None) is None:
    print('symbol %r is not bound in module %r' % (sys.argv[2], sys.argv[1]), file=sys.stderr)
    sys.exit(3)
";

/// Import smoke tests over the configured targets.
#[derive(Debug)]
pub struct LoadCheck {
    interpreter: Vec<String>,
    targets: Vec<LoadTarget>,
}

impl LoadCheck {
    /// Builds the check from resolved load-check settings.
    #[must_use]
    pub fn new(load_checks: &ResolvedLoadChecks) -> Self {
        Self {
            interpreter: load_checks.interpreter.clone(),
            targets: load_checks.targets.clone(),
        }
    }

    fn probe_argv(&self, target: &LoadTarget) -> Vec<String> {
        let mut argv = self.interpreter.clone();
        argv.push("-c".to_string());
        argv.push(PROBE_PROGRAM.to_string());
        argv.push(target.module.clone());
        argv.push(target.symbol.clone());
        argv
    }
}

#[async_trait]
impl Check for LoadCheck {
    fn name(&self) -> &str {
        "load checks"
    }

    fn kind(&self) -> CheckKind {
        CheckKind::LoadCheck
    }

    async fn run(&self, ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        let mut confirmations = Vec::with_capacity(self.targets.len());

        for target in &self.targets {
            info!(module = %target.module, symbol = %target.symbol, "probing target");
            let status =
                exec::spawn_status(self.name(), &self.probe_argv(target), &ctx.project_root)
                    .await?;

            match status.code() {
                Some(0) => {
                    let line = format!(
                        "{} OK ({}:{})",
                        target.display_label(),
                        target.module,
                        target.symbol
                    );
                    // Confirmations print as they are verified so a later
                    // failure cannot suppress earlier ones.
                    println!("{line}");
                    confirmations.push(line);
                }
                Some(MISSING_SYMBOL_EXIT) => {
                    return Err(CheckError::MissingSymbol {
                        module: target.module.clone(),
                        symbol: target.symbol.clone(),
                        code: MISSING_SYMBOL_EXIT,
                    });
                }
                code => {
                    return Err(CheckError::LoadFailed {
                        label: target.display_label().to_string(),
                        module: target.module.clone(),
                        code: code.unwrap_or(ExitCode::ERROR),
                    });
                }
            }
        }

        Ok(CheckReport { confirmations })
    }
}

// ============================================================================
// Tests
// ============================================================================
