//! Configuration module for the pillar CI tools.
//!
//! This module handles all configuration-related functionality:
//! - Parsing the optional `citools.yaml` settings file
//! - Parsing rendered pillar documents and snapshots
//! - Validation of run parameters

mod parser;
mod settings;
mod validator;

pub use parser::{ConfigParser, DEFAULT_CONFIG_FILES, find_config_file};
pub use settings::ToolConfig;
pub use validator::{ConfigValidator, is_valid_name};
