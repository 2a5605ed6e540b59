//! Error types for tool registration and dispatch.

use lodestar_schema::{SchemaError, SchemaType};
use serde::Serialize;
use thiserror::Error;

/// A boxed error returned by a tool's own callable.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while dispatching a tool call.
///
/// Every variant is a value-level failure for one call; none of them
/// affects the registry or other calls.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No tool with this name is registered, or it is outside a filtered view.
    #[error("function not found: '{0}'")]
    FunctionNotFound(String),

    /// A required argument was absent or `null`.
    #[error("missing argument '{0}'")]
    MissingArgument(String),

    /// An argument had the wrong JSON type.
    #[error("argument '{parameter}' should be {expected}, found {found}")]
    TypeMismatch {
        /// Parameter name.
        parameter: String,
        /// Schema type the parameter declares.
        expected: SchemaType,
        /// Kind of value that was supplied.
        found: String,
    },

    /// A string argument is not one of the enum's cases.
    #[error("invalid value '{value}' for argument '{parameter}'")]
    InvalidEnumValue {
        /// Parameter name.
        parameter: String,
        /// The rejected value.
        value: String,
    },

    /// A parameter's enum type is not present in the registry's catalog.
    #[error("unsupported type `{0}`: enum is not registered")]
    UnsupportedType(String),

    /// The raw argument payload was not a JSON object.
    #[error("malformed arguments: {0}")]
    MalformedArguments(String),

    /// The callable's result could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The callable itself failed. The original error is preserved.
    #[error(transparent)]
    Failed(BoxError),
}

/// Coarse category of a [`DispatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// [`DispatchError::FunctionNotFound`].
    NotFound,
    /// Missing, mistyped or out-of-range arguments, or a malformed payload.
    InvalidArguments,
    /// [`DispatchError::UnsupportedType`].
    Unsupported,
    /// [`DispatchError::Serialization`].
    Serialization,
    /// [`DispatchError::Failed`].
    Failed,
}

impl ErrorKind {
    /// Returns the `snake_case` name of this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidArguments => "invalid_arguments",
            Self::Unsupported => "unsupported",
            Self::Serialization => "serialization",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DispatchError {
    /// Creates a [`TypeMismatch`](Self::TypeMismatch).
    pub fn type_mismatch(
        parameter: impl Into<String>,
        expected: SchemaType,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            parameter: parameter.into(),
            expected,
            found: found.into(),
        }
    }

    /// Creates an [`InvalidEnumValue`](Self::InvalidEnumValue).
    pub fn invalid_enum_value(parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidEnumValue {
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Wraps a callable's own failure.
    pub fn failed(err: impl Into<BoxError>) -> Self {
        Self::Failed(err.into())
    }

    /// Returns the category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FunctionNotFound(_) => ErrorKind::NotFound,
            Self::MissingArgument(_)
            | Self::TypeMismatch { .. }
            | Self::InvalidEnumValue { .. }
            | Self::MalformedArguments(_) => ErrorKind::InvalidArguments,
            Self::UnsupportedType(_) => ErrorKind::Unsupported,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Failed(_) => ErrorKind::Failed,
        }
    }

    /// Returns the name of the offending parameter, for argument errors.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::MissingArgument(parameter)
            | Self::TypeMismatch { parameter, .. }
            | Self::InvalidEnumValue { parameter, .. } => Some(parameter),
            _ => None,
        }
    }

    /// Returns the callable's own error, if this is [`Failed`](Self::Failed).
    #[must_use]
    pub fn source_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Failed(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Errors that can occur while building or registering tools.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The tool's descriptor is invalid.
    #[error("invalid tool schema: {0}")]
    Schema(#[from] SchemaError),

    /// A tool with this name is already registered.
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    /// The handler takes a different number of arguments than the tool declares.
    #[error("tool '{tool}' declares {parameters} parameters but its handler takes {handler}")]
    HandlerArity {
        /// Tool name.
        tool: String,
        /// Number of declared parameters.
        parameters: usize,
        /// Number of handler arguments.
        handler: usize,
    },
}

impl RegistryError {
    /// Creates a [`DuplicateTool`](Self::DuplicateTool).
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateTool(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("upstream timed out")]
    struct Upstream;

    #[test]
    fn kinds() {
        assert_eq!(
            DispatchError::FunctionNotFound("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            DispatchError::invalid_enum_value("units", "kelvin").kind(),
            ErrorKind::InvalidArguments
        );
        assert_eq!(DispatchError::failed(Upstream).kind(), ErrorKind::Failed);
    }

    #[test]
    fn failed_is_transparent() {
        let err = DispatchError::failed(Upstream);
        assert_eq!(err.to_string(), "upstream timed out");
        assert!(err.source_error().is_some_and(|e| e.is::<Upstream>()));
    }

    #[test]
    fn messages_name_the_parameter() {
        let err = DispatchError::type_mismatch("a", SchemaType::Integer, "string");
        assert_eq!(err.to_string(), "argument 'a' should be integer, found string");
        assert_eq!(err.parameter(), Some("a"));
    }
}
