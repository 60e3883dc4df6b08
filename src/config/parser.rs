//! Parsers for tool settings and pillar documents.
//!
//! Settings are loaded from YAML with environment variable overrides.
//! Pillar documents are rendered YAML or JSON and parse into
//! [`ConfigTree`]s.

use crate::error::{CitoolsError, ConfigError, Result};
use crate::tree::ConfigTree;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::settings::ToolConfig;

/// Parser for tool settings and pillar documents.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving `.env`.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path used to locate `.env`.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads tool settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ToolConfig> {
        let path = path.as_ref();
        info!("Loading settings from: {}", path.display());

        if !path.exists() {
            return Err(CitoolsError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            CitoolsError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses tool settings from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<ToolConfig> {
        debug!("Parsing settings YAML");

        // An empty settings file means all defaults.
        if content.trim().is_empty() {
            return Ok(ToolConfig::default());
        }

        let config: ToolConfig = serde_yaml::from_str(content).map_err(|e| {
            CitoolsError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })?;

        Ok(config)
    }

    /// Loads settings, falling back to defaults when no file is given, and
    /// applies environment variable overrides.
    ///
    /// Environment variables use the form `CITOOLS_<KEY>`
    /// (e.g. `CITOOLS_PILLAR_ROOT`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: Option<&Path>) -> Result<ToolConfig> {
        let mut config = match path {
            Some(path) => self.load_file(path)?,
            None => {
                debug!("No settings file, using defaults");
                ToolConfig::default()
            }
        };

        Self::apply_env_overrides(&mut config);

        Ok(config)
    }

    /// Applies environment variable overrides to the settings.
    fn apply_env_overrides(config: &mut ToolConfig) {
        if let Ok(root) = std::env::var("CITOOLS_PILLAR_ROOT") {
            debug!("Overriding pillar_root from environment");
            config.pillar_root = PathBuf::from(root);
        }

        if let Ok(env) = std::env::var("CITOOLS_TARGET_ENV") {
            debug!("Overriding target_env from environment");
            config.target_env = env;
        }

        if let Ok(prefix) = std::env::var("CITOOLS_CHANGE_ENV_PREFIX") {
            debug!("Overriding change_env_prefix from environment");
            config.change_env_prefix = prefix;
        }
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                CitoolsError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Parses a rendered pillar document for a single host.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML/JSON or its root
    /// is not a mapping.
    pub fn parse_pillar(content: &str, location: Option<&Path>) -> std::result::Result<ConfigTree, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
            ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: location.map(|p| p.display().to_string()),
            }
        })?;

        ConfigTree::try_from(value).map_err(|e| with_location(e, location))
    }

    /// Parses a pillar snapshot mapping host ids to pillar documents.
    ///
    /// Host values are returned unconverted so that a malformed host does
    /// not invalidate the whole snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a mapping of host ids.
    pub fn parse_snapshot(
        content: &str,
        location: Option<&Path>,
    ) -> std::result::Result<BTreeMap<String, serde_yaml::Value>, ConfigError> {
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Snapshot must map host ids to pillar data: {e}"),
            location: location.map(|p| p.display().to_string()),
        })
    }
}

/// Attaches a file location to a parse error that has none.
fn with_location(error: ConfigError, location: Option<&Path>) -> ConfigError {
    match error {
        ConfigError::ParseError {
            message,
            location: None,
        } => ConfigError::ParseError {
            message,
            location: location.map(|p| p.display().to_string()),
        },
        other => other,
    }
}

/// Default settings file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["citools.yaml", "citools.yml", ".citools.yaml"];

/// Finds the settings file in the given directory or its parents.
#[must_use]
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Option<PathBuf> {
    let mut current = start_dir.as_ref().to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found settings file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if !current.pop() {
            return None;
        }
    }
}
