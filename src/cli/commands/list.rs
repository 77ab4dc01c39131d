//! `list` command handler.
//!
//! Prints the resolved pipeline: checks in execution order and load-check
//! targets in probe order. Useful for verifying what a `run` would do,
//! especially with registry discovery in play.

use tracing::info;

use crate::cli::args::{ListArgs, OutputFormat};
use crate::config::DEFAULT_CONFIG_FILE;
use crate::config::loader::{ConfigLoader, LoadResult, LoaderOptions, ResolvedConfig};
use crate::error::PreflightError;

/// Print the resolved pipeline and load-check targets.
///
/// # Errors
///
/// Returns a config error when the configuration cannot be loaded.
pub fn run(args: &ListArgs) -> Result<(), PreflightError> {
    let load_result = load(args)?;
    let config = &load_result.config;

    match args.format {
        OutputFormat::Human => render_human(config),
        OutputFormat::Json => {
            let body = serde_json::json!({
                "harness": config.name,
                "checks": [
                    {
                        "name": "prepare environment",
                        "installer": config.environment.installer,
                        "manifest": config.environment.manifest,
                        "self_upgrade": config.environment.self_upgrade,
                    },
                    {
                        "name": "strict lint pass",
                        "command": config.lint.command,
                        "select": config.lint.strict_select,
                    },
                    {
                        "name": "advisory lint pass",
                        "command": config.lint.command,
                        "max_complexity": config.lint.max_complexity,
                        "max_line_length": config.lint.max_line_length,
                    },
                    {
                        "name": "load checks",
                        "interpreter": config.load_checks.interpreter,
                        "registry": config.load_checks.registry,
                    },
                ],
                "targets": config.load_checks.targets,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

fn load(args: &ListArgs) -> Result<LoadResult, PreflightError> {
    let loader = ConfigLoader::new(LoaderOptions {
        project_root: args.project.clone(),
    });

    if let Some(path) = &args.config {
        return Ok(loader.load(path)?);
    }

    let conventional = args.project.join(DEFAULT_CONFIG_FILE);
    if conventional.exists() {
        return Ok(loader.load(&conventional)?);
    }

    info!("no {DEFAULT_CONFIG_FILE} in project root, listing built-in defaults");
    Ok(loader.load_default()?)
}

fn render_human(config: &ResolvedConfig) {
    println!("harness: {}", config.name);
    println!("checks:");
    println!(
        "  1. prepare environment (installer: {}, manifest: {})",
        config.environment.installer.join(" "),
        config.environment.manifest.display()
    );
    println!(
        "  2. strict lint pass (select: {})",
        config.lint.strict_select.join(",")
    );
    println!(
        "  3. advisory lint pass (max-complexity: {}, max-line-length: {})",
        config.lint.max_complexity, config.lint.max_line_length
    );
    println!(
        "  4. load checks (interpreter: {})",
        config.load_checks.interpreter.join(" ")
    );
    println!("targets:");
    for (i, target) in config.load_checks.targets.iter().enumerate() {
        println!(
            "  {}. {} ({}:{})",
            i + 1,
            target.display_label(),
            target.module,
            target.symbol
        );
    }
}
