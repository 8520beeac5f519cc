//! Format-specific write options.
//!
//! Options travel as a string-keyed bag so new formats can add keys without
//! touching the export layer. Each encoder lists the keys it understands and
//! rejects everything else before any file is opened.

use crate::io::error::FormatError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single option value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl OptionValue {
    fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "integer",
            OptionValue::Float(_) => "float",
            OptionValue::Str(_) => "string",
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

/// String-keyed options forwarded to a format encoder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WriteOptions(BTreeMap<String, OptionValue>);

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fail on the first key not listed in `known`.
    pub fn ensure_known(&self, format: &'static str, known: &[&str]) -> Result<(), FormatError> {
        match self.0.keys().find(|key| !known.contains(&key.as_str())) {
            Some(key) => Err(FormatError::InvalidOption {
                format,
                key: key.clone(),
                reason: if known.is_empty() {
                    "format takes no options".to_string()
                } else {
                    format!("expected one of {known:?}")
                },
            }),
            None => Ok(()),
        }
    }

    /// Read a boolean option, falling back to `default` when unset.
    pub fn bool_or(
        &self,
        format: &'static str,
        key: &str,
        default: bool,
    ) -> Result<bool, FormatError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(OptionValue::Bool(v)) => Ok(*v),
            Some(other) => Err(FormatError::InvalidOption {
                format,
                key: key.to_string(),
                reason: format!("expected bool, found {}", other.type_name()),
            }),
        }
    }

    /// Read a string option, falling back to `default` when unset.
    pub fn str_or<'a>(
        &'a self,
        format: &'static str,
        key: &str,
        default: &'a str,
    ) -> Result<&'a str, FormatError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(OptionValue::Str(v)) => Ok(v),
            Some(other) => Err(FormatError::InvalidOption {
                format,
                key: key.to_string(),
                reason: format!("expected string, found {}", other.type_name()),
            }),
        }
    }
}
