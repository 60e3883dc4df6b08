//! Tree diffing.
//!
//! This module handles the comparison between the pillar of the target
//! environment and the pillar of the incoming environment for one host.

mod delta;
mod engine;

pub use delta::{Delta, DeltaKind, KeyPath, PATH_DELIMITER};
pub use engine::{DiffEngine, diff};
