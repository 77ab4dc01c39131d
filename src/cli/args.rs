//! CLI argument definitions.
//!
//! All Clap derive structs for preflight command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Local pre-flight validation harness mirroring CI checks.
#[derive(Parser, Debug)]
#[command(name = "preflight", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PREFLIGHT_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full check pipeline.
    Run(RunArgs),

    /// Validate harness configuration files without running any checks.
    Validate(ValidateArgs),

    /// Print the resolved pipeline and load-check targets.
    List(ListArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

// ============================================================================
// Run Command
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the harness configuration file. Defaults to
    /// `preflight.yaml` in the project root, then the built-in defaults.
    #[arg(short, long, env = "PREFLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root the checks run against.
    #[arg(long, default_value = ".", env = "PREFLIGHT_PROJECT")]
    pub project: PathBuf,

    /// File to write the JSONL event stream to.
    #[arg(long, env = "PREFLIGHT_EVENTS_FILE")]
    pub events_file: Option<PathBuf>,
}

// ============================================================================
// Validate Command
// ============================================================================

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Configuration files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Project root registry paths resolve against.
    #[arg(long, default_value = ".", env = "PREFLIGHT_PROJECT")]
    pub project: PathBuf,
}

// ============================================================================
// List Command
// ============================================================================

/// Arguments for `list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path to the harness configuration file.
    #[arg(short, long, env = "PREFLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Project root the configuration resolves against.
    #[arg(long, default_value = ".", env = "PREFLIGHT_PROJECT")]
    pub project: PathBuf,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_no_flags() {
        let cli = Cli::try_parse_from(["preflight", "run"]);
        assert!(cli.is_ok(), "Failed to parse: {cli:?}");
    }

    #[test]
    fn test_run_with_config() {
        let cli = Cli::try_parse_from(["preflight", "run", "--config", "preflight.yaml"]);
        assert!(cli.is_ok(), "Failed to parse: {cli:?}");
    }

    #[test]
    fn test_run_default_project_root() {
        let cli = Cli::try_parse_from(["preflight", "run"]).unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.project, PathBuf::from("."));
            assert!(args.config.is_none());
            return;
        }
        panic!("Expected RunArgs");
    }

    #[test]
    fn test_validate_requires_files() {
        let result = Cli::try_parse_from(["preflight", "validate"]);
        assert!(result.is_err(), "Expected error for missing files");
    }

    #[test]
    fn test_validate_formats_parse() {
        for format in ["human", "json"] {
            let cli =
                Cli::try_parse_from(["preflight", "validate", "--format", format, "c.yaml"]);
            assert!(cli.is_ok(), "Failed to parse format={format}");
        }
    }

    #[test]
    fn test_help_output() {
        let result = Cli::try_parse_from(["preflight", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_output() {
        let result = Cli::try_parse_from(["preflight", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_color_choices_parse() {
        for variant in ["auto", "always", "never"] {
            let cli = Cli::try_parse_from(["preflight", "--color", variant, "run"]);
            assert!(cli.is_ok(), "Failed to parse color={variant}");
        }
    }

    #[test]
    fn test_completions_shells_parse() {
        for shell in ["bash", "zsh", "fish", "powershell", "elvish"] {
            let cli = Cli::try_parse_from(["preflight", "completions", shell]);
            assert!(cli.is_ok(), "Failed to parse shell={shell}");
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::try_parse_from(["preflight", "-vvv", "run"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["preflight", "--quiet", "run"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_run_rejects_positional_arguments() {
        let result = Cli::try_parse_from(["preflight", "run", "something"]);
        assert!(result.is_err(), "run must not consume positional arguments");
    }
}
