//! Configuration loader.
//!
//! The loading pipeline:
//! 1. Read the raw YAML (file or the embedded default).
//! 2. Parse into [`HarnessConfig`].
//! 3. Semantic validation (errors abort, warnings are returned).
//! 4. Resolve command fields to argument vectors.
//! 5. Resolve load-check targets (inline list or registry discovery).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::schema::{HarnessConfig, LoadTarget, ServiceRegistry};
use crate::config::validation::{Validator, has_errors};
use crate::error::{ConfigError, Severity, ValidationIssue};

/// The harness configuration embedded in the binary, used when no
/// configuration file is present.
pub const EMBEDDED_DEFAULT: &str = include_str!("../../configs/default.yaml");

/// Origin name reported for the embedded configuration.
pub const EMBEDDED_ORIGIN: &str = "<builtin>";

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Root directory that relative paths (manifest, registry) resolve
    /// against.
    pub project_root: PathBuf,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
        }
    }
}

/// Result of loading a configuration.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded, validated, and resolved configuration.
    pub config: Arc<ResolvedConfig>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// A fully resolved harness configuration, ready to build the pipeline.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Harness name for banners and events.
    pub name: String,

    /// Environment preparer settings.
    pub environment: ResolvedEnvironment,

    /// Static checker settings.
    pub lint: ResolvedLint,

    /// Load-check runner settings.
    pub load_checks: ResolvedLoadChecks,
}

/// Resolved environment preparer settings.
#[derive(Debug, Clone)]
pub struct ResolvedEnvironment {
    /// Installer argv.
    pub installer: Vec<String>,
    /// Manifest path relative to the project root.
    pub manifest: PathBuf,
    /// Whether the installer upgrades itself first.
    pub self_upgrade: bool,
    /// Package upgraded by the self-upgrade step.
    pub upgrade_package: String,
}

/// Resolved static checker settings.
#[derive(Debug, Clone)]
pub struct ResolvedLint {
    /// Lint tool argv.
    pub command: Vec<String>,
    /// Strict pass rule codes.
    pub strict_select: Vec<String>,
    /// Advisory complexity threshold.
    pub max_complexity: u32,
    /// Advisory line-length threshold.
    pub max_line_length: u32,
}

/// Resolved load-check settings.
#[derive(Debug, Clone)]
pub struct ResolvedLoadChecks {
    /// Interpreter argv.
    pub interpreter: Vec<String>,
    /// Probe targets in fixed order (entry point first).
    pub targets: Vec<LoadTarget>,
    /// Registry path the targets were discovered from, if any.
    pub registry: Option<PathBuf>,
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Loads and resolves a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] when the file does not exist,
    /// [`ConfigError::ParseError`] on malformed YAML, and
    /// [`ConfigError::ValidationError`] when semantic validation fails.
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        self.load_from_str(&raw, &path.display().to_string())
    }

    /// Loads and resolves the embedded default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded document is invalid, which the
    /// test suite rules out.
    pub fn load_default(&self) -> Result<LoadResult, ConfigError> {
        self.load_from_str(EMBEDDED_DEFAULT, EMBEDDED_ORIGIN)
    }

    /// Loads and resolves a configuration from a raw YAML string.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`load`](Self::load), minus the file read.
    pub fn load_from_str(&self, raw: &str, origin: &str) -> Result<LoadResult, ConfigError> {
        let config: HarnessConfig = serde_yaml::from_str(raw).map_err(|e| parse_error(origin, &e))?;

        let issues = Validator::new().validate(&config);
        if has_errors(&issues) {
            return Err(ConfigError::ValidationError {
                path: origin.to_string(),
                errors: issues,
            });
        }
        let mut warnings: Vec<LoadWarning> = issues.iter().map(warning_from_issue).collect();

        let resolved = self.resolve(&config, origin, &mut warnings)?;

        Ok(LoadResult {
            config: Arc::new(resolved),
            warnings,
        })
    }

    fn resolve(
        &self,
        config: &HarnessConfig,
        origin: &str,
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let environment = ResolvedEnvironment {
            installer: config.environment.installer.to_argv("environment.installer")?,
            manifest: config.environment.manifest.clone(),
            self_upgrade: config.environment.self_upgrade,
            upgrade_package: config.environment.upgrade_package.clone(),
        };

        if !self.options.project_root.join(&environment.manifest).exists() {
            warnings.push(LoadWarning {
                message: format!(
                    "dependency manifest {} not found under project root",
                    environment.manifest.display()
                ),
                location: Some("environment.manifest".to_string()),
            });
        }

        let lint = ResolvedLint {
            command: config.lint.command.to_argv("lint.command")?,
            strict_select: config.lint.strict.select.clone(),
            max_complexity: config.lint.advisory.max_complexity,
            max_line_length: config.lint.advisory.max_line_length,
        };

        let load_checks = self.resolve_targets(config, origin)?;

        Ok(ResolvedConfig {
            name: config.harness.name.clone(),
            environment,
            lint,
            load_checks,
        })
    }

    fn resolve_targets(
        &self,
        config: &HarnessConfig,
        origin: &str,
    ) -> Result<ResolvedLoadChecks, ConfigError> {
        let interpreter = config
            .load_checks
            .interpreter
            .to_argv("load_checks.interpreter")?;

        // Validation already rejected both-set and neither-set.
        let (targets, registry) = match (&config.load_checks.targets, &config.load_checks.registry)
        {
            (Some(targets), None) => (targets.clone(), None),
            (None, Some(registry)) => {
                let path = self.options.project_root.join(registry);
                (self.load_registry(&path)?, Some(registry.clone()))
            }
            _ => {
                return Err(ConfigError::ValidationError {
                    path: origin.to_string(),
                    errors: vec![ValidationIssue {
                        path: "load_checks".to_string(),
                        message: "exactly one of targets or registry is required".to_string(),
                        severity: Severity::Error,
                    }],
                });
            }
        };

        Ok(ResolvedLoadChecks {
            interpreter,
            targets,
            registry,
        })
    }

    fn load_registry(&self, path: &Path) -> Result<Vec<LoadTarget>, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;
        let origin = path.display().to_string();
        let registry: ServiceRegistry =
            serde_yaml::from_str(&raw).map_err(|e| parse_error(&origin, &e))?;

        let issues = Validator::new().validate_registry(&registry);
        if has_errors(&issues) {
            return Err(ConfigError::ValidationError {
                path: origin,
                errors: issues,
            });
        }

        Ok(registry.into_targets())
    }
}

fn parse_error(origin: &str, e: &serde_yaml::Error) -> ConfigError {
    ConfigError::ParseError {
        path: origin.to_string(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    }
}

fn warning_from_issue(issue: &ValidationIssue) -> LoadWarning {
    LoadWarning {
        message: issue.message.clone(),
        location: Some(issue.path.clone()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn loader_in(root: &Path) -> ConfigLoader {
        ConfigLoader::new(LoaderOptions {
            project_root: root.to_path_buf(),
        })
    }

    #[test]
    fn embedded_default_loads() {
        let result = ConfigLoader::default().load_default().unwrap();
        assert_eq!(result.config.name, "transcription-bot-preflight");
        assert_eq!(result.config.environment.installer, vec!["python3", "-m", "pip"]);
        assert_eq!(result.config.lint.command, vec!["flake8"]);
        assert_eq!(result.config.load_checks.interpreter, vec!["python3"]);
    }

    #[test]
    fn embedded_default_targets_fixed_order() {
        let result = ConfigLoader::default().load_default().unwrap();
        let modules: Vec<&str> = result
            .config
            .load_checks
            .targets
            .iter()
            .map(|t| t.module.as_str())
            .collect();
        assert_eq!(
            modules,
            vec![
                "app.main",
                "app.services.auth",
                "app.services.transcription",
                "app.storage.transcripts",
            ]
        );
    }

    #[test]
    fn embedded_default_symbols_match_convention() {
        let result = ConfigLoader::default().load_default().unwrap();
        let targets = &result.config.load_checks.targets;
        assert_eq!(targets[0].symbol, "app");
        assert_eq!(targets[1].symbol, "auth_service");
        assert_eq!(targets[2].symbol, "transcription_service");
        assert_eq!(targets[3].symbol, "transcript_storage");
    }

    #[test]
    fn missing_file_reported() {
        let err = ConfigLoader::default()
            .load(Path::new("/nonexistent/preflight.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn parse_error_carries_origin() {
        let err = ConfigLoader::default()
            .load_from_str("harness: [", "bad.yaml")
            .unwrap_err();
        match err {
            ConfigError::ParseError { path, .. } => assert_eq!(path, "bad.yaml"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn validation_errors_abort_loading() {
        let err = ConfigLoader::default()
            .load_from_str("harness:\n  name: t\n", "t.yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn missing_manifest_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = "\
harness:
  name: t
load_checks:
  targets:
    - module: app.main
      symbol: app
";
        let result = loader_in(dir.path()).load_from_str(yaml, "t.yaml").unwrap();
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.message.contains("manifest")),
            "expected manifest warning: {:?}",
            result.warnings
        );
    }

    #[test]
    fn registry_discovery_resolves_targets() {
        let dir = tempfile::tempdir().unwrap();
        let registry_path = dir.path().join("registry.yaml");
        let mut file = std::fs::File::create(&registry_path).unwrap();
        write!(
            file,
            "\
entrypoint:
  module: app.main
  symbol: app
  label: application entry point
services:
  - module: app.services.auth
    symbol: auth_service
  - module: app.services.transcription
    symbol: transcription_service
"
        )
        .unwrap();

        let yaml = "\
harness:
  name: t
load_checks:
  registry: registry.yaml
";
        let result = loader_in(dir.path()).load_from_str(yaml, "t.yaml").unwrap();
        let targets = &result.config.load_checks.targets;
        assert_eq!(targets.len(), 3);
        assert_eq!(targets[0].module, "app.main");
        assert_eq!(targets[1].module, "app.services.auth");
        assert_eq!(targets[2].module, "app.services.transcription");
        assert_eq!(
            result.config.load_checks.registry.as_deref(),
            Some(Path::new("registry.yaml"))
        );
    }

    #[test]
    fn missing_registry_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = "\
harness:
  name: t
load_checks:
  registry: nowhere.yaml
";
        let err = loader_in(dir.path())
            .load_from_str(yaml, "t.yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn invalid_registry_contents_reported() {
        let dir = tempfile::tempdir().unwrap();
        let registry_path = dir.path().join("registry.yaml");
        std::fs::write(&registry_path, "entrypoint:\n  module: \"\"\n  symbol: app\n").unwrap();

        let yaml = "\
harness:
  name: t
load_checks:
  registry: registry.yaml
";
        let err = loader_in(dir.path())
            .load_from_str(yaml, "t.yaml")
            .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn validation_warnings_surface_as_load_warnings() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "").unwrap();
        let yaml = "\
harness:
  name: \"\"
load_checks:
  targets:
    - module: app.main
      symbol: app
";
        let result = loader_in(dir.path()).load_from_str(yaml, "t.yaml").unwrap();
        assert!(
            result
                .warnings
                .iter()
                .any(|w| w.location.as_deref() == Some("harness.name"))
        );
    }
}
