//! Validation of run parameters.
//!
//! Environment names and host ids end up as path components when pillar
//! data is read from disk, so they are checked before any source is
//! touched.

use crate::error::{ConfigError, Result};
use std::collections::HashSet;
use tracing::debug;

/// Validator for the parameters of a validation run.
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates the environments and hosts of a run.
    ///
    /// Returns non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is invalid or both environments are the
    /// same.
    pub fn validate_run(
        &self,
        target_env: &str,
        incoming_env: &str,
        hosts: &[String],
    ) -> Result<Vec<String>> {
        debug!("Validating run {target_env} -> {incoming_env} for {} hosts", hosts.len());

        for (field, env) in [("target_env", target_env), ("incoming_env", incoming_env)] {
            if !is_valid_name(env) {
                return Err(ConfigError::validation(
                    format!("Invalid environment name '{env}'"),
                    field,
                )
                .into());
            }
        }

        if target_env == incoming_env {
            return Err(ConfigError::validation(
                format!("Target and incoming environments are both '{target_env}'"),
                "incoming_env",
            )
            .into());
        }

        let mut warnings = Vec::new();
        let mut seen = HashSet::new();
        for host in hosts {
            if !is_valid_name(host) {
                return Err(ConfigError::validation(format!("Invalid host id '{host}'"), "hosts").into());
            }
            if !seen.insert(host.as_str()) {
                warnings.push(format!("Host '{host}' is listed more than once"));
            }
        }

        Ok(warnings)
    }
}

/// Checks that a name is usable as a single path component.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.chars().any(char::is_whitespace)
}
