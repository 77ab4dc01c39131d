//! Error types for preflight.
//!
//! A fail-fast harness has a simple propagation policy: the first failure
//! aborts the run, and failing checks carry the underlying tool's exit code
//! so the harness exits with the same status the tool did.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for preflight CLI operations.
///
/// These codes follow Unix conventions. Failing checks do not use a fixed
/// code of their own: they propagate the child process's exit status
/// verbatim via [`CheckError::exit_code`].
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for preflight operations.
///
/// Aggregates all domain-specific errors and provides a unified interface
/// for error handling and exit code mapping.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A check failed or could not be executed
    #[error(transparent)]
    Check(#[from] CheckError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid command-line usage not caught by the parser
    #[error("{0}")]
    Usage(String),
}

impl PreflightError {
    /// Returns the appropriate exit code for this error.
    ///
    /// Check failures propagate the child process's exit status; everything
    /// else maps to a fixed constant.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) | Self::Yaml(_) => ExitCode::CONFIG_ERROR,
            Self::Check(e) => e.exit_code(),
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Origin of the configuration (file path or `<builtin>`)
        path: String,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Configuration validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Origin of the configuration
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced configuration or registry file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },

    /// A command field resolved to an empty argument vector
    #[error("empty command for '{field}'")]
    EmptyCommand {
        /// Name of the offending field
        field: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found during configuration validation.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "load_checks.targets")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - validation failure that prevents the configuration from being used
    Error,
    /// Warning - potential issue that does not prevent configuration loading
    Warning,
}

// ============================================================================
// Check Errors
// ============================================================================

/// Errors raised while executing a check.
///
/// Every variant is fatal: the runner aborts on the first one and the
/// harness exits with [`CheckError::exit_code`]. There is no retry and no
/// fallback path.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The underlying tool could not be spawned at all
    #[error("{check}: failed to spawn `{command}`: {message}")]
    SpawnFailed {
        /// Name of the check that attempted the spawn
        check: String,
        /// Program that failed to start
        command: String,
        /// OS-level error message
        message: String,
    },

    /// A pipeline step exited non-zero
    #[error("{check} failed with exit code {code}")]
    StepFailed {
        /// Name of the failing check
        check: String,
        /// Child process exit code (signal deaths map to 1)
        code: i32,
    },

    /// A load-check target's module failed to import or initialize
    #[error("{label}: module `{module}` failed to load (exit code {code})")]
    LoadFailed {
        /// Human label of the failing target
        label: String,
        /// Module path that failed to load
        module: String,
        /// Probe process exit code
        code: i32,
    },

    /// A load-check target's module loaded but the expected symbol is absent
    #[error("module `{module}` loaded but does not bind `{symbol}`")]
    MissingSymbol {
        /// Module that loaded successfully
        module: String,
        /// The symbol expected at module scope
        symbol: String,
        /// Probe process exit code
        code: i32,
    },
}

impl CheckError {
    /// Returns the exit code for this failure.
    ///
    /// Step, load, and symbol failures propagate the child's exit status;
    /// spawn failures have no child status and map to the generic error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::SpawnFailed { .. } => ExitCode::ERROR,
            Self::StepFailed { code, .. }
            | Self::LoadFailed { code, .. }
            | Self::MissingSymbol { code, .. } => *code,
        }
    }
}

/// Result type alias for preflight operations.
pub type Result<T> = std::result::Result<T, PreflightError>;

// ============================================================================
// Tests
// ============================================================================
