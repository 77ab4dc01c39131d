//! Configuration schema types.
//!
//! These types are deserialized from YAML harness configuration files and
//! from application service registry files. Every optional field has a
//! default reproducing the conventional pipeline, so an empty section (or no
//! configuration file at all) behaves exactly like the fixed script the
//! harness replaces.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root configuration for a preflight harness.
///
/// The load-check section supports two mutually exclusive forms:
/// - **Inline targets**: `load_checks.targets` lists the probe targets.
/// - **Registry discovery**: `load_checks.registry` points at a service
///   registry file the application itself maintains.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HarnessConfig {
    /// Harness metadata (required)
    pub harness: HarnessMetadata,

    /// Environment preparer settings
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Static checker settings
    #[serde(default)]
    pub lint: LintConfig,

    /// Load-check runner settings
    #[serde(default)]
    pub load_checks: LoadChecksConfig,
}

/// Harness identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HarnessMetadata {
    /// Harness name (required)
    pub name: String,

    /// Harness version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ============================================================================
// Command Fields
// ============================================================================

/// A command given either as a single shell-quoted line or as an explicit
/// argument vector.
///
/// ```yaml
/// installer: python3 -m pip          # line form, split with shlex
/// command: ["flake8"]                # argv form, used verbatim
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandField {
    /// A single line split with shell quoting rules.
    Line(String),
    /// An explicit argument vector.
    Argv(Vec<String>),
}

impl CommandField {
    /// Resolves the field to an argument vector.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when the line form cannot be
    /// split, and [`ConfigError::EmptyCommand`] when the result is empty.
    pub fn to_argv(&self, field: &str) -> Result<Vec<String>, ConfigError> {
        let argv = match self {
            Self::Argv(v) => v.clone(),
            Self::Line(s) => shlex::split(s).ok_or_else(|| ConfigError::InvalidValue {
                field: field.to_string(),
                value: s.clone(),
                expected: "a shell-quotable command line".to_string(),
            })?,
        };

        if argv.is_empty() || argv.iter().all(|s| s.is_empty()) {
            return Err(ConfigError::EmptyCommand {
                field: field.to_string(),
            });
        }

        Ok(argv)
    }

    /// Returns true when the field holds no program at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Line(s) => s.trim().is_empty(),
            Self::Argv(v) => v.is_empty() || v.iter().all(|s| s.is_empty()),
        }
    }
}

impl std::fmt::Display for CommandField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Line(s) => write!(f, "{s}"),
            Self::Argv(v) => write!(f, "{}", v.join(" ")),
        }
    }
}

// ============================================================================
// Environment Preparer
// ============================================================================

/// Environment preparer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EnvironmentConfig {
    /// Package installer invocation.
    #[serde(default = "default_installer")]
    pub installer: CommandField,

    /// Dependency manifest, relative to the project root.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Whether to upgrade the installer itself before installing.
    #[serde(default = "default_true")]
    pub self_upgrade: bool,

    /// Package name upgraded by the self-upgrade step.
    #[serde(default = "default_upgrade_package")]
    pub upgrade_package: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            installer: default_installer(),
            manifest: default_manifest(),
            self_upgrade: true,
            upgrade_package: default_upgrade_package(),
        }
    }
}

// ============================================================================
// Static Checker
// ============================================================================

/// Static checker settings shared by the strict and advisory passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LintConfig {
    /// Lint tool invocation.
    #[serde(default = "default_lint_command")]
    pub command: CommandField,

    /// Strict pass settings.
    #[serde(default)]
    pub strict: StrictLintConfig,

    /// Advisory pass settings.
    #[serde(default)]
    pub advisory: AdvisoryLintConfig,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            command: default_lint_command(),
            strict: StrictLintConfig::default(),
            advisory: AdvisoryLintConfig::default(),
        }
    }
}

/// Strict pass rule selection.
///
/// The defaults select the defect classes that would break the application
/// at runtime: syntax errors, undefined names, malformed format strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StrictLintConfig {
    /// Rule codes passed to the linter's `--select`.
    #[serde(default = "default_strict_select")]
    pub select: Vec<String>,
}

impl Default for StrictLintConfig {
    fn default() -> Self {
        Self {
            select: default_strict_select(),
        }
    }
}

/// Advisory pass thresholds.
///
/// Findings from this pass are reported but never fail the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdvisoryLintConfig {
    /// Cyclomatic complexity threshold.
    #[serde(default = "default_max_complexity")]
    pub max_complexity: u32,

    /// Maximum line length.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: u32,
}

impl Default for AdvisoryLintConfig {
    fn default() -> Self {
        Self {
            max_complexity: default_max_complexity(),
            max_line_length: default_max_line_length(),
        }
    }
}

// ============================================================================
// Load Checks
// ============================================================================

/// Load-check runner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoadChecksConfig {
    /// Interpreter used to probe target modules.
    #[serde(default = "default_interpreter")]
    pub interpreter: CommandField,

    /// Inline probe targets, in probe order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Vec<LoadTarget>>,

    /// Path to the application's service registry file, relative to the
    /// project root. Mutually exclusive with `targets`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<PathBuf>,
}

impl Default for LoadChecksConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            targets: None,
            registry: None,
        }
    }
}

/// A single load-check target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoadTarget {
    /// Module path to import (e.g., `app.services.auth`).
    pub module: String,

    /// Symbol expected to be bound at module scope after loading.
    pub symbol: String,

    /// Human-readable label for banners and confirmation lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LoadTarget {
    /// Returns the display label, falling back to the module path.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.module)
    }
}

/// An application-maintained service registry.
///
/// The application declares its entry point and service modules here; the
/// harness derives its load-check targets from this file so the two cannot
/// drift. The entry point is always probed first, services follow in
/// declaration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceRegistry {
    /// The application entry point.
    pub entrypoint: LoadTarget,

    /// Declared service modules, in probe order.
    #[serde(default)]
    pub services: Vec<LoadTarget>,
}

impl ServiceRegistry {
    /// Flattens the registry into probe order: entry point first.
    #[must_use]
    pub fn into_targets(self) -> Vec<LoadTarget> {
        let mut targets = Vec::with_capacity(1 + self.services.len());
        targets.push(self.entrypoint);
        targets.extend(self.services);
        targets
    }
}

// ============================================================================
// Defaults
// ============================================================================

fn default_installer() -> CommandField {
    CommandField::Line("python3 -m pip".to_string())
}

fn default_manifest() -> PathBuf {
    PathBuf::from("requirements.txt")
}

const fn default_true() -> bool {
    true
}

fn default_upgrade_package() -> String {
    "pip".to_string()
}

fn default_lint_command() -> CommandField {
    CommandField::Line("flake8".to_string())
}

fn default_strict_select() -> Vec<String> {
    ["E9", "F63", "F7", "F82"]
        .into_iter()
        .map(String::from)
        .collect()
}

const fn default_max_complexity() -> u32 {
    10
}

const fn default_max_line_length() -> u32 {
    127
}

fn default_interpreter() -> CommandField {
    CommandField::Line("python3".to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: HarnessConfig = serde_yaml::from_str("harness:\n  name: t\n").unwrap();
        assert_eq!(config.harness.name, "t");
        assert_eq!(config.environment.manifest, PathBuf::from("requirements.txt"));
        assert!(config.environment.self_upgrade);
        assert_eq!(config.environment.upgrade_package, "pip");
        assert_eq!(config.lint.strict.select, vec!["E9", "F63", "F7", "F82"]);
        assert_eq!(config.lint.advisory.max_complexity, 10);
        assert_eq!(config.lint.advisory.max_line_length, 127);
        assert!(config.load_checks.targets.is_none());
        assert!(config.load_checks.registry.is_none());
    }

    #[test]
    fn command_field_line_form_splits() {
        let field = CommandField::Line("python3 -m pip".to_string());
        let argv = field.to_argv("environment.installer").unwrap();
        assert_eq!(argv, vec!["python3", "-m", "pip"]);
    }

    #[test]
    fn command_field_line_form_respects_quoting() {
        let field = CommandField::Line("sh -c 'exit 0'".to_string());
        let argv = field.to_argv("lint.command").unwrap();
        assert_eq!(argv, vec!["sh", "-c", "exit 0"]);
    }

    #[test]
    fn command_field_argv_form_verbatim() {
        let field = CommandField::Argv(vec!["flake8".to_string()]);
        let argv = field.to_argv("lint.command").unwrap();
        assert_eq!(argv, vec!["flake8"]);
    }

    #[test]
    fn command_field_empty_line_rejected() {
        let field = CommandField::Line(String::new());
        let err = field.to_argv("environment.installer").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCommand { .. }));
    }

    #[test]
    fn command_field_empty_argv_rejected() {
        let field = CommandField::Argv(vec![]);
        let err = field.to_argv("load_checks.interpreter").unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCommand { .. }));
    }

    #[test]
    fn command_field_deserializes_both_forms() {
        #[derive(Deserialize)]
        struct Wrapper {
            cmd: CommandField,
        }

        let line: Wrapper = serde_yaml::from_str("cmd: flake8 --version\n").unwrap();
        assert!(matches!(line.cmd, CommandField::Line(_)));

        let argv: Wrapper = serde_yaml::from_str("cmd: [flake8, --version]\n").unwrap();
        assert!(matches!(argv.cmd, CommandField::Argv(_)));
    }

    #[test]
    fn load_target_label_fallback() {
        let target = LoadTarget {
            module: "app.main".to_string(),
            symbol: "app".to_string(),
            label: None,
        };
        assert_eq!(target.display_label(), "app.main");
    }

    #[test]
    fn registry_flattens_entrypoint_first() {
        let registry = ServiceRegistry {
            entrypoint: LoadTarget {
                module: "app.main".to_string(),
                symbol: "app".to_string(),
                label: Some("entry".to_string()),
            },
            services: vec![
                LoadTarget {
                    module: "app.services.auth".to_string(),
                    symbol: "auth_service".to_string(),
                    label: None,
                },
                LoadTarget {
                    module: "app.storage.transcripts".to_string(),
                    symbol: "transcript_storage".to_string(),
                    label: None,
                },
            ],
        };

        let targets = registry.into_targets();
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].module, "app.main");
        assert_eq!(targets[1].module, "app.services.auth");
        assert_eq!(targets[2].module, "app.storage.transcripts");
    }

    #[test]
    fn registry_yaml_round_trip() {
        let yaml = "\
entrypoint:
  module: app.main
  symbol: app
services:
  - module: app.services.auth
    symbol: auth_service
";
        let registry: ServiceRegistry = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(registry.entrypoint.symbol, "app");
        assert_eq!(registry.services.len(), 1);
    }

    #[test]
    fn inline_targets_parse_in_order() {
        let yaml = "\
harness:
  name: t
load_checks:
  targets:
    - module: app.main
      symbol: app
    - module: app.services.auth
      symbol: auth_service
";
        let config: HarnessConfig = serde_yaml::from_str(yaml).unwrap();
        let targets = config.load_checks.targets.unwrap();
        assert_eq!(targets[0].module, "app.main");
        assert_eq!(targets[1].module, "app.services.auth");
    }
}
