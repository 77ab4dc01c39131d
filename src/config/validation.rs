//! Semantic validation of harness configurations.
//!
//! Parsing catches malformed YAML; this pass catches configurations that
//! parse but cannot drive a meaningful run (no targets, conflicting target
//! sources, degenerate thresholds).

use std::collections::HashSet;

use crate::config::schema::{HarnessConfig, LoadTarget, ServiceRegistry};
use crate::error::{Severity, ValidationIssue};

/// Collects validation issues for a parsed configuration.
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a harness configuration and returns all issues found.
    #[must_use]
    pub fn validate(mut self, config: &HarnessConfig) -> Vec<ValidationIssue> {
        self.check_metadata(config);
        self.check_commands(config);
        self.check_lint(config);
        self.check_load_checks(config);
        self.issues
    }

    /// Validates a service registry file's contents.
    #[must_use]
    pub fn validate_registry(mut self, registry: &ServiceRegistry) -> Vec<ValidationIssue> {
        self.check_target(&registry.entrypoint, "entrypoint");
        for (i, service) in registry.services.iter().enumerate() {
            self.check_target(service, &format!("services[{i}]"));
        }
        self.check_duplicate_modules(
            std::iter::once(&registry.entrypoint).chain(registry.services.iter()),
            "services",
        );
        self.issues
    }

    fn check_metadata(&mut self, config: &HarnessConfig) {
        if config.harness.name.trim().is_empty() {
            self.warning("harness.name", "harness name is empty");
        }
    }

    fn check_commands(&mut self, config: &HarnessConfig) {
        if config.environment.installer.is_empty() {
            self.error("environment.installer", "installer command is empty");
        }
        if config.lint.command.is_empty() {
            self.error("lint.command", "lint command is empty");
        }
        if config.load_checks.interpreter.is_empty() {
            self.error("load_checks.interpreter", "interpreter command is empty");
        }
        if config.environment.self_upgrade && config.environment.upgrade_package.trim().is_empty() {
            self.error(
                "environment.upgrade_package",
                "self_upgrade is enabled but upgrade_package is empty",
            );
        }
    }

    fn check_lint(&mut self, config: &HarnessConfig) {
        if config.lint.strict.select.is_empty() {
            self.warning(
                "lint.strict.select",
                "strict pass selects no rules and will pass vacuously",
            );
        }
        if config
            .lint
            .strict
            .select
            .iter()
            .any(|code| code.trim().is_empty())
        {
            self.error("lint.strict.select", "rule codes must be non-empty");
        }
        if config.lint.advisory.max_line_length == 0 {
            self.error(
                "lint.advisory.max_line_length",
                "maximum line length must be positive",
            );
        }
        if config.lint.advisory.max_complexity == 0 {
            self.error(
                "lint.advisory.max_complexity",
                "complexity threshold must be positive",
            );
        }
    }

    fn check_load_checks(&mut self, config: &HarnessConfig) {
        match (&config.load_checks.targets, &config.load_checks.registry) {
            (Some(_), Some(_)) => self.error(
                "load_checks",
                "targets and registry are mutually exclusive",
            ),
            (None, None) => self.error(
                "load_checks",
                "no load-check targets declared (set targets or registry)",
            ),
            (Some(targets), None) => {
                if targets.is_empty() {
                    self.error("load_checks.targets", "target list is empty");
                }
                for (i, target) in targets.iter().enumerate() {
                    self.check_target(target, &format!("load_checks.targets[{i}]"));
                }
                self.check_duplicate_modules(targets.iter(), "load_checks.targets");
            }
            // Registry contents are validated after the file is read.
            (None, Some(_)) => {}
        }
    }

    fn check_target(&mut self, target: &LoadTarget, location: &str) {
        if target.module.trim().is_empty() {
            self.error(&format!("{location}.module"), "module path is empty");
        }
        if target.symbol.trim().is_empty() {
            self.error(&format!("{location}.symbol"), "symbol name is empty");
        }
    }

    fn check_duplicate_modules<'a>(
        &mut self,
        targets: impl Iterator<Item = &'a LoadTarget>,
        location: &str,
    ) {
        let mut seen = HashSet::new();
        for target in targets {
            if !seen.insert(target.module.as_str()) {
                self.warning(
                    location,
                    &format!("module `{}` is probed more than once", target.module),
                );
            }
        }
    }

    fn error(&mut self, path: &str, message: &str) {
        self.issues.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, path: &str, message: &str) {
        self.issues.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

/// Returns true when any issue in the slice is an error.
#[must_use]
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.severity == Severity::Error)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> HarnessConfig {
        serde_yaml::from_str(yaml).expect("fixture config must parse")
    }

    const INLINE_TARGETS: &str = "\
harness:
  name: t
load_checks:
  targets:
    - module: app.main
      symbol: app
";

    #[test]
    fn valid_inline_config_has_no_errors() {
        let issues = Validator::new().validate(&parse(INLINE_TARGETS));
        assert!(!has_errors(&issues), "unexpected issues: {issues:?}");
    }

    #[test]
    fn both_target_forms_rejected() {
        let config = parse(
            "\
harness:
  name: t
load_checks:
  registry: app/registry.yaml
  targets:
    - module: app.main
      symbol: app
",
        );
        let issues = Validator::new().validate(&config);
        assert!(has_errors(&issues));
        assert!(
            issues
                .iter()
                .any(|i| i.message.contains("mutually exclusive"))
        );
    }

    #[test]
    fn missing_target_forms_rejected() {
        let config = parse("harness:\n  name: t\n");
        let issues = Validator::new().validate(&config);
        assert!(has_errors(&issues));
        assert!(issues.iter().any(|i| i.path == "load_checks"));
    }

    #[test]
    fn empty_target_list_rejected() {
        let config = parse("harness:\n  name: t\nload_checks:\n  targets: []\n");
        let issues = Validator::new().validate(&config);
        assert!(has_errors(&issues));
    }

    #[test]
    fn empty_module_located() {
        let config = parse(
            "\
harness:
  name: t
load_checks:
  targets:
    - module: \"\"
      symbol: app
",
        );
        let issues = Validator::new().validate(&config);
        assert!(
            issues
                .iter()
                .any(|i| i.path == "load_checks.targets[0].module")
        );
    }

    #[test]
    fn duplicate_modules_warn() {
        let config = parse(
            "\
harness:
  name: t
load_checks:
  targets:
    - module: app.main
      symbol: app
    - module: app.main
      symbol: other
",
        );
        let issues = Validator::new().validate(&config);
        assert!(!has_errors(&issues));
        assert!(issues.iter().any(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn empty_harness_name_warns() {
        let config = parse(
            "\
harness:
  name: \"\"
load_checks:
  targets:
    - module: app.main
      symbol: app
",
        );
        let issues = Validator::new().validate(&config);
        assert!(!has_errors(&issues));
        assert!(issues.iter().any(|i| i.path == "harness.name"));
    }

    #[test]
    fn zero_line_length_rejected() {
        let config = parse(
            "\
harness:
  name: t
lint:
  advisory:
    max_line_length: 0
load_checks:
  targets:
    - module: app.main
      symbol: app
",
        );
        let issues = Validator::new().validate(&config);
        assert!(has_errors(&issues));
        assert!(
            issues
                .iter()
                .any(|i| i.path == "lint.advisory.max_line_length")
        );
    }

    #[test]
    fn empty_strict_select_warns() {
        let config = parse(
            "\
harness:
  name: t
lint:
  strict:
    select: []
load_checks:
  targets:
    - module: app.main
      symbol: app
",
        );
        let issues = Validator::new().validate(&config);
        assert!(!has_errors(&issues));
        assert!(issues.iter().any(|i| i.path == "lint.strict.select"));
    }

    #[test]
    fn registry_validation_locates_issues() {
        let registry: ServiceRegistry = serde_yaml::from_str(
            "\
entrypoint:
  module: app.main
  symbol: \"\"
services:
  - module: \"\"
    symbol: auth_service
",
        )
        .unwrap();
        let issues = Validator::new().validate_registry(&registry);
        assert!(has_errors(&issues));
        assert!(issues.iter().any(|i| i.path == "entrypoint.symbol"));
        assert!(issues.iter().any(|i| i.path == "services[0].module"));
    }
}
