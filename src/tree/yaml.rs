//! Conversion from parsed YAML documents into pillar trees.
//!
//! JSON documents go through the same path since `serde_yaml` accepts them.

use serde_yaml::Value;

use crate::error::ConfigError;

use super::value::{ConfigTree, ConfigValue, Scalar};

impl TryFrom<Value> for ConfigValue {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Scalar(Scalar::Null)),
            Value::Bool(b) => Ok(Self::Scalar(Scalar::Bool(b))),
            Value::Number(n) => Ok(Self::Scalar(number_to_scalar(&n))),
            Value::String(s) => Ok(Self::Scalar(Scalar::String(s))),
            Value::Sequence(items) => items
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Sequence),
            Value::Mapping(mapping) => ConfigTree::try_from(Value::Mapping(mapping)).map(Self::Tree),
            Value::Tagged(tagged) => Self::try_from(tagged.value),
        }
    }
}

impl TryFrom<Value> for ConfigTree {
    type Error = ConfigError;

    /// Converts a YAML mapping into a tree.
    ///
    /// `null` converts to an empty tree, matching an empty pillar document.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Mapping(mapping) => {
                let mut tree = Self::new();
                for (key, item) in mapping {
                    let key = mapping_key(key)?;
                    tree.insert(key, ConfigValue::try_from(item)?);
                }
                Ok(tree)
            }
            Value::Tagged(tagged) => Self::try_from(tagged.value),
            other => Err(ConfigError::ParseError {
                message: format!(
                    "expected a mapping at the document root, found {}",
                    yaml_kind(&other)
                ),
                location: None,
            }),
        }
    }
}

/// Converts a YAML number, preferring an exact integer representation.
fn number_to_scalar(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Scalar::UInt(u)
    } else {
        n.as_f64().map_or(Scalar::Null, Scalar::Float)
    }
}

/// Converts a mapping key to its string form.
///
/// Pillar keys are addressed as strings (`salt '*' pillar.get a:b`), so
/// numeric and boolean keys are stringified.
fn mapping_key(key: Value) -> Result<String, ConfigError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Tagged(tagged) => mapping_key(tagged.value),
        other => Err(ConfigError::ParseError {
            message: format!("unsupported mapping key of type {}", yaml_kind(&other)),
            location: None,
        }),
    }
}

const fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}
