//! Harness configuration: schema, loading, and validation.

pub mod loader;
pub mod schema;
pub mod validation;

/// Conventional configuration file name, looked up in the project root when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "preflight.yaml";
