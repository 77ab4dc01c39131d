//! `run` command handler.
//!
//! Resolves the configuration source, builds the fixed-order pipeline, and
//! executes it to completion or first failure.

use tracing::{info, warn};

use crate::check::CheckContext;
use crate::cli::args::RunArgs;
use crate::config::DEFAULT_CONFIG_FILE;
use crate::config::loader::{ConfigLoader, LoadResult, LoaderOptions};
use crate::error::PreflightError;
use crate::observability::EventEmitter;
use crate::runner::Runner;

/// Run the full check pipeline.
///
/// Configuration resolution order: `--config` if given, the conventional
/// `preflight.yaml` in the project root if present, otherwise the built-in
/// defaults.
///
/// # Errors
///
/// Returns a config error for unloadable configurations and the first
/// failing check's error otherwise.
pub async fn run(args: &RunArgs) -> Result<(), PreflightError> {
    let load_result = load(args)?;

    for warning in &load_result.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let events = match &args.events_file {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };

    let context = CheckContext {
        project_root: args.project.clone(),
    };

    let runner = Runner::from_config(&load_result.config, context, events);
    runner.run().await?;
    Ok(())
}

fn load(args: &RunArgs) -> Result<LoadResult, PreflightError> {
    let loader = ConfigLoader::new(LoaderOptions {
        project_root: args.project.clone(),
    });

    if let Some(path) = &args.config {
        info!(config = %path.display(), "loading configuration");
        return Ok(loader.load(path)?);
    }

    let conventional = args.project.join(DEFAULT_CONFIG_FILE);
    if conventional.exists() {
        info!(config = %conventional.display(), "loading configuration");
        return Ok(loader.load(&conventional)?);
    }

    info!("no {DEFAULT_CONFIG_FILE} in project root, using built-in defaults");
    Ok(loader.load_default()?)
}
