//! Delta types produced by the diff engine.

use serde::Serialize;
use std::fmt::{self, Write};

use crate::tree::ConfigValue;

/// Delimiter used when displaying a key path, as in `pillar.get a:b:c`.
pub const PATH_DELIMITER: char = ':';

/// Ordered sequence of keys from the tree root to a value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

/// A single structural difference between two trees.
#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    /// The key exists only in the incoming tree.
    Added {
        /// Path to the key.
        path: KeyPath,
        /// Incoming value.
        value: ConfigValue,
    },
    /// The key exists only in the base tree.
    Removed {
        /// Path to the key.
        path: KeyPath,
        /// Base value.
        value: ConfigValue,
    },
    /// The key exists in both trees with different values.
    Changed {
        /// Path to the key.
        path: KeyPath,
        /// Base value.
        old: ConfigValue,
        /// Incoming value.
        new: ConfigValue,
    },
}

/// Classification of a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaKind {
    /// Key added.
    Added,
    /// Key removed.
    Removed,
    /// Value changed.
    Changed,
}

impl KeyPath {
    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the top-level namespace (first segment).
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns the last segment.
    #[must_use]
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for KeyPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for KeyPath {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(|s| (*s).to_string()).collect())
    }
}

/// Joins segments with [`PATH_DELIMITER`].
///
/// A delimiter or backslash inside a segment is escaped with a backslash,
/// so the key `a:b` (`a\:b`) never collides with the nested path `a` -> `b`.
impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_DELIMITER}")?;
            }
            for c in segment.chars() {
                if c == PATH_DELIMITER || c == '\\' {
                    f.write_char('\\')?;
                }
                f.write_char(c)?;
            }
        }
        Ok(())
    }
}

impl Delta {
    /// Returns the path of the delta.
    #[must_use]
    pub const fn path(&self) -> &KeyPath {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Changed { path, .. } => {
                path
            }
        }
    }

    /// Returns the kind of the delta.
    #[must_use]
    pub const fn kind(&self) -> DeltaKind {
        match self {
            Self::Added { .. } => DeltaKind::Added,
            Self::Removed { .. } => DeltaKind::Removed,
            Self::Changed { .. } => DeltaKind::Changed,
        }
    }

    /// Returns the delta seen from the other direction.
    ///
    /// `diff(a, b)` inverted equals `diff(b, a)`.
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::Added { path, value } => Self::Removed { path, value },
            Self::Removed { path, value } => Self::Added { path, value },
            Self::Changed { path, old, new } => Self::Changed {
                path,
                old: new,
                new: old,
            },
        }
    }
}

impl fmt::Display for DeltaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { path, value } => write!(f, "{path}: added ({value})"),
            Self::Removed { path, value } => write!(f, "{path}: removed ({value})"),
            Self::Changed { path, old, new } => write!(f, "{path}: changed ({old} -> {new})"),
        }
    }
}
