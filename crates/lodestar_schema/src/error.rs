//! Definition-time errors for tool schemas.
//!
//! These are raised while a descriptor is being built, never during dispatch.
//! Any of them blocks the descriptor entirely.

use crate::types::SchemaType;
use thiserror::Error;

/// A declared parameter type the mapper cannot express in the schema vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unsupported type `{type_name}`; supported types are String, integers, floats, bool, \
     Option<T> of those, and closed string enums"
)]
pub struct UnsupportedType {
    /// Textual name of the offending type.
    pub type_name: String,
}

impl UnsupportedType {
    /// Creates a diagnostic for the given type text.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
        }
    }
}

/// Errors that can occur while building a [`ToolDescriptor`](crate::ToolDescriptor).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A parameter's declared type cannot be mapped.
    #[error("parameter '{parameter}': {source}")]
    Unsupported {
        /// Parameter whose type was rejected.
        parameter: String,
        /// The mapper diagnostic.
        #[source]
        source: UnsupportedType,
    },

    /// Two parameters share a name.
    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(String),

    /// A default or description was given for a parameter that was never declared.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A default value does not fit the parameter it was declared for.
    #[error("default value for parameter '{parameter}' is not a valid {expected}")]
    DefaultTypeMismatch {
        /// Parameter carrying the default.
        parameter: String,
        /// Schema type the default should have matched.
        expected: SchemaType,
    },

    /// The tool name is empty.
    #[error("tool name must not be empty")]
    EmptyName,
}

impl SchemaError {
    /// Creates an [`Unsupported`](Self::Unsupported) error for a parameter.
    pub fn unsupported(parameter: impl Into<String>, source: UnsupportedType) -> Self {
        Self::Unsupported {
            parameter: parameter.into(),
            source,
        }
    }

    /// Returns the offending type name for [`Unsupported`](Self::Unsupported) errors.
    #[must_use]
    pub fn unsupported_type(&self) -> Option<&str> {
        match self {
            Self::Unsupported { source, .. } => Some(&source.type_name),
            _ => None,
        }
    }
}
