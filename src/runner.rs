//! Fixed-order fail-fast pipeline runner.
//!
//! Owns the ordered list of checks, prints a labeled banner before each one,
//! executes each to completion, and aborts on the first failure. Execution
//! is strictly sequential: nothing runs concurrently with anything else, and
//! a started check always runs to its natural completion.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::check::install::InstallCheck;
use crate::check::lint::LintCheck;
use crate::check::probe::LoadCheck;
use crate::check::{Check, CheckContext};
use crate::config::loader::ResolvedConfig;
use crate::error::PreflightError;
use crate::observability::{Event, EventEmitter};

// ============================================================================
// Pipeline State
// ============================================================================

/// Progress of a pipeline run.
///
/// The pipeline advances one state per completed check and has a single
/// absorbing `Failed` state reachable from any in-progress state. No
/// transition leaves `Failed` or `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// No check has started yet.
    NotStarted,
    /// `completed` checks have finished successfully.
    Running {
        /// Number of checks completed so far.
        completed: usize,
    },
    /// Every check completed successfully.
    Done,
    /// A check failed; the run is over.
    Failed {
        /// Number of checks that had completed when the failure occurred.
        completed: usize,
    },
}

impl PipelineState {
    /// Marks the run as started.
    #[must_use]
    pub const fn start(self) -> Self {
        match self {
            Self::NotStarted => Self::Running { completed: 0 },
            other => other,
        }
    }

    /// Records one completed check out of `total`. Only a running pipeline
    /// advances; terminal states and `NotStarted` are unchanged.
    #[must_use]
    pub const fn advance(self, total: usize) -> Self {
        match self {
            Self::Running { completed } => {
                let completed = completed + 1;
                if completed >= total {
                    Self::Done
                } else {
                    Self::Running { completed }
                }
            }
            other => other,
        }
    }

    /// Enters the absorbing failed state.
    #[must_use]
    pub const fn fail(self) -> Self {
        match self {
            Self::NotStarted => Self::Failed { completed: 0 },
            Self::Running { completed } => Self::Failed { completed },
            terminal => terminal,
        }
    }

    /// Returns whether the state admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed { .. })
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Outcome of a successful pipeline run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Per-check wall time, in execution order.
    pub timings: Vec<(String, Duration)>,

    /// Total wall time.
    pub total: Duration,
}

/// The fixed-order pipeline runner.
pub struct Runner {
    name: String,
    checks: Vec<Box<dyn Check>>,
    context: CheckContext,
    events: EventEmitter,
}

impl Runner {
    /// Builds the conventional pipeline from a resolved configuration:
    /// environment, strict lint, advisory lint, load checks.
    #[must_use]
    pub fn from_config(
        config: &ResolvedConfig,
        context: CheckContext,
        events: EventEmitter,
    ) -> Self {
        let checks: Vec<Box<dyn Check>> = vec![
            Box::new(InstallCheck::new(&config.environment)),
            Box::new(LintCheck::strict(&config.lint)),
            Box::new(LintCheck::advisory(&config.lint)),
            Box::new(LoadCheck::new(&config.load_checks)),
        ];
        Self::new(config.name.clone(), checks, context, events)
    }

    /// Builds a runner over an explicit check sequence.
    #[must_use]
    pub fn new(
        name: String,
        checks: Vec<Box<dyn Check>>,
        context: CheckContext,
        events: EventEmitter,
    ) -> Self {
        Self {
            name,
            checks,
            context,
            events,
        }
    }

    /// Runs every check in order, aborting on the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first check's error unchanged; its exit code is the
    /// harness exit code.
    pub async fn run(self) -> Result<RunOutcome, PreflightError> {
        let total_checks = self.checks.len();
        let mut state = PipelineState::NotStarted.start();
        let mut timings = Vec::with_capacity(total_checks);
        let run_started = Instant::now();

        self.events.emit(Event::run_started(&self.name, total_checks));

        for check in &self.checks {
            println!("==> {}", check.name());
            self.events
                .emit(Event::check_started(check.name(), check.kind().as_str()));

            let started = Instant::now();
            match check.run(&self.context).await {
                Ok(report) => {
                    let elapsed = started.elapsed();
                    info!(
                        check = check.name(),
                        duration = %format_duration(elapsed),
                        "check passed"
                    );
                    self.events.emit(Event::check_passed(check.name(), elapsed));
                    for confirmation in &report.confirmations {
                        self.events.emit(Event::target_confirmed(confirmation));
                    }
                    timings.push((check.name().to_string(), elapsed));
                    state = state.advance(total_checks);
                    debug!(?state, "pipeline advanced");
                }
                Err(e) => {
                    state = state.fail();
                    debug!(?state, "pipeline failed");
                    self.events
                        .emit(Event::check_failed(check.name(), e.exit_code()));
                    self.events.emit(Event::run_finished("failed"));
                    return Err(e.into());
                }
            }
        }

        let total = run_started.elapsed();
        self.events.emit(Event::run_finished("passed"));
        println!("{} passed in {}", self.name, format_duration(total));

        Ok(RunOutcome { timings, total })
    }
}

/// Formats a duration with millisecond precision for human output.
fn format_duration(d: Duration) -> humantime::FormattedDuration {
    humantime::format_duration(Duration::from_millis(
        u64::try_from(d.as_millis()).unwrap_or(u64::MAX),
    ))
}

// ============================================================================
// Tests
// ============================================================================
