// metrology-core/src/domain/catalog/raw.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Scraper-extracted facts, keyed by field name.
pub type RawData = BTreeMap<String, RawValue>;

/// A closed set of values a scraper can extract.
///
/// Variant order matters for untagged deserialization: `null` must be tried
/// before everything else, and booleans before numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
    Map(BTreeMap<String, RawValue>),
}

impl RawValue {
    /// Whether the value counts as a declaration: non-blank text, a non-zero
    /// number, `true`, or any list/map.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.trim().is_empty(),
            Self::List(_) | Self::Map(_) => true,
        }
    }

    /// Scalar rendering used when a rule inspects the declared text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null | Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for RawValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
