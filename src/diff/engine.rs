//! Diff engine for comparing two pillar trees.
//!
//! This module computes the structural difference between the pillar
//! rendered for a target environment and the pillar rendered for an
//! incoming environment.

use std::collections::BTreeSet;
use tracing::debug;

use crate::error::DiffError;
use crate::tree::{ConfigTree, ConfigValue};

use super::delta::{Delta, KeyPath};

/// Engine for computing diffs between two pillar trees.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiffEngine;

impl DiffEngine {
    /// Creates a new diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the deltas that turn `base` into `incoming`.
    ///
    /// Keys are visited in lexicographic order, so the result is stable for
    /// identical inputs.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::TypeMismatch`] if any visited value is neither a
    /// scalar nor a mapping.
    pub fn diff(&self, base: &ConfigTree, incoming: &ConfigTree) -> Result<Vec<Delta>, DiffError> {
        let mut deltas = Vec::new();
        let mut path = Vec::new();
        Self::diff_trees(base, incoming, &mut path, &mut deltas)?;
        debug!("Computed {} deltas", deltas.len());
        Ok(deltas)
    }

    /// Walks the union of keys of two trees.
    fn diff_trees(
        base: &ConfigTree,
        incoming: &ConfigTree,
        path: &mut Vec<String>,
        deltas: &mut Vec<Delta>,
    ) -> Result<(), DiffError> {
        let keys: BTreeSet<&String> = base.keys().chain(incoming.keys()).collect();

        for key in keys {
            path.push(key.clone());

            match (base.get(key), incoming.get(key)) {
                (Some(old), None) => {
                    Self::ensure_supported(old, path)?;
                    deltas.push(Delta::Removed {
                        path: KeyPath::from(path.clone()),
                        value: old.clone(),
                    });
                }
                (None, Some(new)) => {
                    Self::ensure_supported(new, path)?;
                    deltas.push(Delta::Added {
                        path: KeyPath::from(path.clone()),
                        value: new.clone(),
                    });
                }
                (Some(ConfigValue::Tree(old)), Some(ConfigValue::Tree(new))) => {
                    Self::diff_trees(old, new, path, deltas)?;
                }
                (Some(old), Some(new)) => {
                    Self::ensure_supported(old, path)?;
                    Self::ensure_supported(new, path)?;
                    if old != new {
                        deltas.push(Delta::Changed {
                            path: KeyPath::from(path.clone()),
                            old: old.clone(),
                            new: new.clone(),
                        });
                    }
                }
                (None, None) => {}
            }

            path.pop();
        }

        Ok(())
    }

    /// Checks that a value and everything below it is a scalar or mapping.
    fn ensure_supported(value: &ConfigValue, path: &mut Vec<String>) -> Result<(), DiffError> {
        match value {
            ConfigValue::Scalar(_) => Ok(()),
            ConfigValue::Tree(tree) => {
                for (key, child) in tree.iter() {
                    path.push(key.clone());
                    Self::ensure_supported(child, path)?;
                    path.pop();
                }
                Ok(())
            }
            ConfigValue::Sequence(_) => Err(DiffError::TypeMismatch {
                path: KeyPath::from(path.clone()),
                found: value.kind(),
            }),
        }
    }
}

/// Computes the deltas between two trees with a default engine.
///
/// # Errors
///
/// Returns [`DiffError::TypeMismatch`] on unsupported values.
pub fn diff(base: &ConfigTree, incoming: &ConfigTree) -> Result<Vec<Delta>, DiffError> {
    DiffEngine::new().diff(base, incoming)
}
