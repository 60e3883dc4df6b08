//! Pillar tree model.
//!
//! This module defines the value types the differ operates on and their
//! conversion from parsed YAML/JSON documents.

mod value;
mod yaml;

pub use value::{ConfigTree, ConfigValue, Scalar};
