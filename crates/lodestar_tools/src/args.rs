//! Loosely-typed argument bags, as they arrive in an LLM function call.

use crate::error::DispatchError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single raw argument value.
///
/// Arrays and objects are carried as [`Structured`](Self::Structured); they
/// never coerce to a parameter type.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number with an exact `i64` representation.
    Integer(i64),
    /// Any other JSON number.
    Float(f64),
    /// JSON string.
    String(String),
    /// JSON array or object.
    Structured(Value),
}

impl ArgValue {
    /// Returns a short name of the value's kind, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Structured(Value::Array(_)) => "array",
            Self::Structured(_) => "object",
        }
    }

    /// Returns `true` for [`Null`](Self::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Converts back to JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(value) => Value::Bool(*value),
            Self::Integer(value) => Value::from(*value),
            Self::Float(value) => Value::from(*value),
            Self::String(value) => Value::String(value.clone()),
            Self::Structured(value) => value.clone(),
        }
    }
}

impl From<Value> for ArgValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(value) => Self::Bool(value),
            Value::Number(number) => match number.as_i64() {
                Some(value) => Self::Integer(value),
                // u64 beyond i64 range, or a float.
                None => Self::Float(number.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(value) => Self::String(value),
            structured @ (Value::Array(_) | Value::Object(_)) => Self::Structured(structured),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl Serialize for ArgValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ArgValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Argument name to raw value. Absence of a key means the argument was omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgumentBag {
    values: IndexMap<String, ArgValue>,
}

impl ArgumentBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets an argument, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ArgValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the raw value of an argument.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    /// Returns whether an argument key is present, even if `null`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over argument names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the bag holds no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a bag from a JSON object map.
    #[must_use]
    pub fn from_json_object(map: Map<String, Value>) -> Self {
        Self {
            values: map
                .into_iter()
                .map(|(name, value)| (name, ArgValue::from(value)))
                .collect(),
        }
    }

    /// Builds a bag from a raw JSON payload.
    ///
    /// Accepts an object, `null` (no arguments), or a string holding a
    /// JSON-encoded object, which is how most providers ship arguments.
    pub fn from_json(value: &Value) -> Result<Self, DispatchError> {
        match value {
            Value::Object(map) => Ok(Self::from_json_object(map.clone())),
            Value::Null => Ok(Self::new()),
            Value::String(encoded) => Self::from_json_str(encoded),
            other => Err(DispatchError::MalformedArguments(format!(
                "expected a JSON object, found {}",
                ArgValue::from(other.clone()).kind()
            ))),
        }
    }

    /// Parses a JSON-encoded object. An empty string means no arguments.
    pub fn from_json_str(encoded: &str) -> Result<Self, DispatchError> {
        if encoded.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(encoded)
            .map_err(|err| DispatchError::MalformedArguments(err.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self::from_json_object(map)),
            Value::Null => Ok(Self::new()),
            other => Err(DispatchError::MalformedArguments(format!(
                "expected a JSON object, found {}",
                ArgValue::from(other).kind()
            ))),
        }
    }
}

impl<K: Into<String>, V: Into<ArgValue>> FromIterator<(K, V)> for ArgumentBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// A tool call as issued by an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the tool to call.
    pub name: String,
    /// Raw arguments: an object, `null`, or a JSON-encoded object string.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    /// Creates a call without an id.
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    /// Sets the call id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Parses the raw arguments into a bag.
    pub fn argument_bag(&self) -> Result<ArgumentBag, DispatchError> {
        ArgumentBag::from_json(&self.arguments)
    }
}
