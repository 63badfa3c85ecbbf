// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Loosely-typed values carried by remote attribute calls.
//!
//! Every attribute setter receives a sequence of [`Value`]s. The sequence can be
//! checked against a compact signature of [`ValueKind`]s before the setter runs,
//! which is how malformed calls get rejected without side effects.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered sequence of loosely-typed values.
pub type Values = Vec<Value>;

/// A single loosely-typed argument or attribute value.
///
/// The serialized form is the natural JSON one (`true`, `3`, `0.5`, `"name"`,
/// `[...]`), which keeps the configuration document readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean, treated as a number by signature checks.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// A nested list of values.
    List(Values),
}

/// The coarse kind of a [`Value`], as used in attribute signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Booleans, integers and floats.
    Number,
    /// Strings.
    String,
    /// Nested lists.
    List,
}

impl ValueKind {
    /// Parses the single-character signature notation (`'n'`, `'s'`, `'v'`).
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(ValueKind::Number),
            's' => Some(ValueKind::String),
            'v' => Some(ValueKind::List),
            _ => None,
        }
    }

    /// Returns the single-character signature notation of this kind.
    pub fn as_char(self) -> char {
        match self {
            ValueKind::Number => 'n',
            ValueKind::String => 's',
            ValueKind::List => 'v',
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Number => write!(f, "number"),
            ValueKind::String => write!(f, "string"),
            ValueKind::List => write!(f, "list"),
        }
    }
}

impl Value {
    /// Returns the signature kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => ValueKind::Number,
            Value::Str(_) => ValueKind::String,
            Value::List(_) => ValueKind::List,
        }
    }

    /// Returns the string content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an integer. Floats are truncated toward zero.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            Value::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    /// Returns the value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a boolean; any non-zero number is `true`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Int(i) => Some(*i != 0),
            Value::Float(f) => Some(*f != 0.0),
            _ => None,
        }
    }

    /// Returns the nested values, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }

    /// Converts this value into its JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(values) => {
                serde_json::Value::Array(values.iter().map(Value::to_json).collect())
            }
        }
    }

    /// Builds a value from JSON. `null` and objects have no equivalent.
    pub fn from_json(json: &serde_json::Value) -> Option<Value> {
        serde_json::from_value(json.clone()).ok()
    }
}

/// Converts a sequence of values into a JSON array.
pub fn values_to_json(values: &[Value]) -> serde_json::Value {
    serde_json::Value::Array(values.iter().map(Value::to_json).collect())
}

/// Converts a JSON value into a sequence of values.
///
/// Arrays map element-wise; a scalar becomes a one-element sequence.
pub fn values_from_json(json: &serde_json::Value) -> Option<Values> {
    match json {
        serde_json::Value::Array(items) => items.iter().map(Value::from_json).collect(),
        other => Value::from_json(other).map(|v| vec![v]),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl From<Values> for Value {
    fn from(v: Values) -> Self {
        Value::List(v)
    }
}
