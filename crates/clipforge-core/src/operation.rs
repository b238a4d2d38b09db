use crate::error::{ClipforgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ParamValue
// ---------------------------------------------------------------------------

/// A recorded transform parameter: either a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// The parameter as text. Numbers are formatted without a trailing `.0`.
    pub fn as_text(&self) -> String {
        match self {
            ParamValue::Number(n) => crate::transforms::format_number(*n),
            ParamValue::Text(s) => s.clone(),
        }
    }

    /// The parameter as a number, parsing text if necessary.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// A recorded `(transform key, parameter values)` pair. Immutable once
/// recorded; ordering within a session is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamValue>,
}

impl Operation {
    pub fn new(name: impl Into<String>, params: Vec<ParamValue>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// Parse the JSON wire form `{"name": ..., "params": [...]}` used when
    /// the pipeline is re-invoked with serialized operations.
    pub fn parse(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| ClipforgeError::InvalidOperation {
            input: input.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return f.write_str(&self.name);
        }
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(f, "{}({})", self.name, params.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
