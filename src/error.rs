//! Error types for the pillar CI tools.
//!
//! This module provides the error hierarchy for every stage of a validation
//! run: tool configuration, pillar sources, and tree diffing.

use std::path::PathBuf;
use thiserror::Error;

use crate::diff::KeyPath;

/// The main error type for the pillar CI tools.
#[derive(Debug, Error)]
pub enum CitoolsError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pillar source errors.
    #[error("Pillar source error: {0}")]
    Source(#[from] SourceError),

    /// Diff errors.
    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A configuration or pillar document could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },
}

/// Pillar source errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The requested pillar environment does not exist in the source.
    #[error("Pillar environment not found: {env}")]
    EnvironmentNotFound {
        /// Name of the missing environment.
        env: String,
    },

    /// The pillar root could not be read.
    #[error("Failed to read pillar data at {path}: {message}")]
    ReadFailed {
        /// Path that failed.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// A pillar document for a single host is malformed.
    #[error("Invalid pillar data for host {host}: {message}")]
    InvalidHostData {
        /// Host whose data is malformed.
        host: String,
        /// Description of the problem.
        message: String,
    },
}

/// Tree diff errors.
#[derive(Debug, Error)]
pub enum DiffError {
    /// A value is neither a scalar nor a mapping.
    #[error("Type mismatch at {path}: expected scalar or mapping, found {found}")]
    TypeMismatch {
        /// Path to the offending value.
        path: KeyPath,
        /// Kind of value that was found.
        found: &'static str,
    },
}

/// Result type alias for pillar CI operations.
pub type Result<T> = std::result::Result<T, CitoolsError>;

impl CitoolsError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error only concerns the data of a single host.
    ///
    /// Host-scoped failures are recorded against that host and the run
    /// continues with the remaining hosts.
    #[must_use]
    pub const fn is_host_scoped(&self) -> bool {
        matches!(
            self,
            Self::Diff(DiffError::TypeMismatch { .. })
                | Self::Source(SourceError::InvalidHostData { .. })
        )
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a validation error without a specific field.
    #[must_use]
    pub fn validation_general(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: None,
        }
    }
}

impl SourceError {
    /// Creates a read error for the given path.
    #[must_use]
    pub fn read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid host data error.
    #[must_use]
    pub fn invalid_host(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHostData {
            host: host.into(),
            message: message.into(),
        }
    }
}

impl DiffError {
    /// Returns the path of the value that caused the error.
    #[must_use]
    pub const fn path(&self) -> &KeyPath {
        match self {
            Self::TypeMismatch { path, .. } => path,
        }
    }
}
