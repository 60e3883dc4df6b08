//! Pillar value types.
//!
//! Pillar data is rendered from YAML/Jinja templates and may contain any
//! YAML value. These types make the shape explicit: a value is either a
//! scalar, a nested tree, or a sequence. Sequences are representable so that
//! the differ can reject them with a precise path instead of guessing.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar pillar value.
///
/// Integers keep their exact value: anything that fits `i64` is an
/// [`Scalar::Integer`], larger unsigned values are a [`Scalar::UInt`].
#[derive(Debug, Clone)]
pub enum Scalar {
    /// YAML `null` / `~`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Integer(i64),
    /// Unsigned integer above `i64::MAX`.
    UInt(u64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
}

/// A single value inside a pillar tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// A leaf value.
    Scalar(Scalar),
    /// A nested mapping.
    Tree(ConfigTree),
    /// A sequence. Not supported by the differ.
    Sequence(Vec<ConfigValue>),
}

/// A nested mapping from string keys to pillar values.
///
/// Keys iterate in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigTree(BTreeMap<String, ConfigValue>);

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_eq(*a, *b),
            (Self::Float(f), int) | (int, Self::Float(f)) => {
                int.as_i128().is_some_and(|n| int_eq_float(n, *f))
            }
            _ => match (self.as_i128(), other.as_i128()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Float equality where NaN equals NaN, so an unchanged `.nan` is no delta.
#[allow(clippy::float_cmp)]
fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Exact integer/float equality: the float must be integral and hold the
/// same value, without rounding the integer to `f64`.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn int_eq_float(n: i128, f: f64) -> bool {
    // 2^100 bounds every i64/u64 and keeps the cast to i128 exact.
    const LIMIT: f64 = 1_267_650_600_228_229_401_496_703_205_376.0;
    f.is_finite() && f.fract() == 0.0 && f.abs() < LIMIT && f as i128 == n
}

impl Serialize for Scalar {
    /// Non-finite floats serialize as their YAML spelling since JSON has
    /// no representation for them.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::UInt(n) => serializer.serialize_u64(*n),
            Self::Float(f) if f.is_nan() => serializer.serialize_str(".nan"),
            Self::Float(f) if f.is_infinite() => {
                serializer.serialize_str(if *f > 0.0 { ".inf" } else { "-.inf" })
            }
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Scalar {
    /// Returns the name of the scalar kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Integer(_) | Self::UInt(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Returns an integer scalar widened to `i128`.
    #[allow(clippy::cast_lossless)]
    const fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Integer(n) => Some(*n as i128),
            Self::UInt(n) => Some(*n as i128),
            _ => None,
        }
    }
}

impl From<u64> for Scalar {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Self::UInt(n), Self::Integer)
    }
}

impl ConfigValue {
    /// Returns the name of the value kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(s) => s.kind(),
            Self::Tree(_) => "mapping",
            Self::Sequence(_) => "sequence",
        }
    }

    /// Returns the nested tree if this value is a mapping.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            Self::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns true if this value is a scalar.
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }
}

impl ConfigTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Returns true if the key exists.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterates over keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterates over entries in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    /// Returns the number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the tree has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigTree {
    fn from(map: BTreeMap<String, ConfigValue>) -> Self {
        Self(map)
    }
}

impl From<Scalar> for ConfigValue {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(tree: ConfigTree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Vec<Self>> for ConfigValue {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Integer(n))
    }
}

impl From<u64> for ConfigValue {
    fn from(n: u64) -> Self {
        Self::Scalar(Scalar::from(n))
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        Self::Scalar(Scalar::Float(n))
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl fmt::Display for ConfigValue {
    /// Formats the value as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_equality_across_kinds() {
        assert_eq!(Scalar::Integer(1), Scalar::Float(1.0));
        assert_eq!(Scalar::Float(2.0), Scalar::Integer(2));
        assert_ne!(Scalar::Integer(1), Scalar::Float(1.5));
        assert_ne!(Scalar::Bool(true), Scalar::Integer(1));
        assert_ne!(Scalar::Null, Scalar::String(String::new()));
    }

    #[test]
    fn test_nan_equals_itself() {
        assert_eq!(Scalar::Float(f64::NAN), Scalar::Float(f64::NAN));
        assert_eq!(Scalar::Float(f64::INFINITY), Scalar::Float(f64::INFINITY));
        assert_ne!(Scalar::Float(f64::INFINITY), Scalar::Float(f64::NEG_INFINITY));
        assert_ne!(Scalar::Float(f64::NAN), Scalar::Float(0.0));
        assert_ne!(Scalar::Float(f64::NAN), Scalar::Null);
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        assert_eq!(Scalar::from(u64::MAX), Scalar::UInt(u64::MAX));
        assert_eq!(Scalar::from(7_u64), Scalar::Integer(7));
        assert_ne!(Scalar::UInt(u64::MAX), Scalar::UInt(u64::MAX - 1));
        assert_ne!(Scalar::UInt(u64::MAX), Scalar::Integer(-1));

        // 2^53 + 1 is not representable as f64; rounding must not hide it.
        assert_ne!(
            Scalar::Integer(9_007_199_254_740_993),
            Scalar::Float(9_007_199_254_740_992.0)
        );
        assert_eq!(
            Scalar::Integer(9_007_199_254_740_992),
            Scalar::Float(9_007_199_254_740_992.0)
        );
        // i64::MAX rounds up to 2^63 as f64.
        assert_ne!(Scalar::Integer(i64::MAX), Scalar::Float(9_223_372_036_854_775_808.0));
        assert_eq!(Scalar::UInt(1 << 63), Scalar::Float(9_223_372_036_854_775_808.0));
        assert_ne!(Scalar::Integer(1), Scalar::Float(f64::NAN));
    }

    #[test]
    fn test_non_finite_floats_display_as_yaml() {
        assert_eq!(ConfigValue::from(f64::NAN).to_string(), r#"".nan""#);
        assert_eq!(ConfigValue::from(f64::INFINITY).to_string(), r#"".inf""#);
        assert_eq!(ConfigValue::from(f64::NEG_INFINITY).to_string(), r#""-.inf""#);
        assert_eq!(ConfigValue::from(u64::MAX).to_string(), "18446744073709551615");
    }

    #[test]
    fn test_tree_keys_are_ordered() {
        let tree = ConfigTree::new()
            .with("zeta", "z")
            .with("alpha", "a")
            .with("mid", 3_i64);

        let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
        assert_eq!(keys, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_display_is_compact_json() {
        let tree = ConfigTree::new().with("token", "REDACTED").with("port", 8200_i64);
        let value = ConfigValue::from(tree);

        assert_eq!(value.to_string(), r#"{"port":8200,"token":"REDACTED"}"#);
        assert_eq!(ConfigValue::from("x").to_string(), r#""x""#);
        assert_eq!(ConfigValue::Scalar(Scalar::Null).to_string(), "null");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ConfigValue::from(vec![ConfigValue::from(1_i64)]).kind(), "sequence");
        assert_eq!(ConfigValue::from(ConfigTree::new()).kind(), "mapping");
        assert_eq!(ConfigValue::from(true).kind(), "bool");
        assert!(ConfigValue::from(1.5).is_scalar());
    }
}
