//! `validate` command handler.
//!
//! Loads and validates harness configuration files (including any registry
//! discovery they declare) without running a single check.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::loader::{ConfigLoader, LoaderOptions};
use crate::error::{ConfigError, PreflightError, Severity};

/// Per-file validation report.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<IssueReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// A single reported issue.
#[derive(Debug, Serialize)]
struct IssueReport {
    severity: &'static str,
    path: String,
    message: String,
}

/// Summary across all validated files.
#[derive(Debug, Serialize)]
struct Summary {
    total: usize,
    valid: usize,
    invalid: usize,
}

/// Validate configuration files without running any checks.
///
/// # Errors
///
/// Returns the first file's error after the full report has been rendered,
/// so the harness exits non-zero when any file is invalid.
pub fn run(args: &ValidateArgs) -> Result<(), PreflightError> {
    let loader = ConfigLoader::new(LoaderOptions {
        project_root: args.project.clone(),
    });

    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error: Option<ConfigError> = None;

    for path in &args.files {
        match loader.load(path) {
            Ok(result) => reports.push(FileReport {
                file: path.display().to_string(),
                valid: true,
                issues: Vec::new(),
                warnings: result.warnings.iter().map(|w| w.message.clone()).collect(),
                error: None,
            }),
            Err(e) => {
                reports.push(report_for_error(path, &e));
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    let summary = Summary {
        total: reports.len(),
        valid: reports.iter().filter(|r| r.valid).count(),
        invalid: reports.iter().filter(|r| !r.valid).count(),
    };

    match args.format {
        OutputFormat::Human => render_human(&reports, &summary),
        OutputFormat::Json => {
            let body = serde_json::json!({ "files": reports, "summary": summary });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    match first_error {
        None => Ok(()),
        Some(e) => Err(e.into()),
    }
}

fn report_for_error(path: &Path, error: &ConfigError) -> FileReport {
    let issues = match error {
        ConfigError::ValidationError { errors, .. } => errors
            .iter()
            .map(|issue| IssueReport {
                severity: match issue.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                },
                path: issue.path.clone(),
                message: issue.message.clone(),
            })
            .collect(),
        _ => Vec::new(),
    };

    FileReport {
        file: path.display().to_string(),
        valid: false,
        issues,
        warnings: Vec::new(),
        error: Some(error.to_string()),
    }
}

fn render_human(reports: &[FileReport], summary: &Summary) {
    for report in reports {
        if report.valid {
            println!("{}: ok", report.file);
            for warning in &report.warnings {
                println!("  warning: {warning}");
            }
        } else {
            println!("{}: FAILED", report.file);
            if let Some(error) = &report.error {
                println!("  {error}");
            }
            for issue in &report.issues {
                println!("  {}: {} at {}", issue.severity, issue.message, issue.path);
            }
        }
    }
    println!(
        "{} file(s) checked, {} valid, {} invalid",
        summary.total, summary.valid, summary.invalid
    );
}
