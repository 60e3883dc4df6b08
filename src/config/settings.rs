//! Tool settings types.
//!
//! This module defines the structs that map to the optional `citools.yaml`
//! settings file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the CI tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Directory holding rendered pillar, one subdirectory per environment.
    #[serde(default = "default_pillar_root")]
    pub pillar_root: PathBuf,
    /// Environment the pull request targets.
    #[serde(default = "default_target_env")]
    pub target_env: String,
    /// Prefix prepended to a change id to name its environment.
    #[serde(default = "default_change_env_prefix")]
    pub change_env_prefix: String,
    /// Hosts validated when none are given on the command line.
    #[serde(default)]
    pub hosts: Vec<String>,
    /// Whether reports include old and new values.
    #[serde(default = "default_show_values")]
    pub show_values: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            pillar_root: default_pillar_root(),
            target_env: default_target_env(),
            change_env_prefix: default_change_env_prefix(),
            hosts: Vec::new(),
            show_values: default_show_values(),
        }
    }
}

impl ToolConfig {
    /// Names the pillar environment of a change, e.g. `dev.1234`.
    #[must_use]
    pub fn change_env(&self, change_id: &str) -> String {
        format!("{}{change_id}", self.change_env_prefix)
    }
}

fn default_pillar_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_target_env() -> String {
    String::from("base")
}

fn default_change_env_prefix() -> String {
    String::from("dev.")
}

const fn default_show_values() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.target_env, "base");
        assert_eq!(config.pillar_root, PathBuf::from("."));
        assert!(config.hosts.is_empty());
        assert!(config.show_values);
    }

    #[test]
    fn test_change_env() {
        let config = ToolConfig::default();
        assert_eq!(config.change_env("change_common_pillar"), "dev.change_common_pillar");
    }
}
