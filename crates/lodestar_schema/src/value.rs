//! Typed parameter values.

use crate::types::SchemaType;
use serde::{Deserialize, Serialize};

/// A value that has been checked against a parameter's schema type.
///
/// Produced by argument coercion and used for declared default values.
/// Enum cases are carried as [`TypedValue::String`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// A string or enum case.
    String(String),
    /// An integer.
    Integer(i64),
    /// A floating-point number.
    Number(f64),
    /// A boolean.
    Boolean(bool),
    /// No value: an optional parameter that was omitted and has no default.
    Absent,
}

impl TypedValue {
    /// Returns the schema type of this value, or `None` for [`Absent`](Self::Absent).
    #[must_use]
    pub fn schema_type(&self) -> Option<SchemaType> {
        match self {
            Self::String(_) => Some(SchemaType::String),
            Self::Integer(_) => Some(SchemaType::Integer),
            Self::Number(_) => Some(SchemaType::Number),
            Self::Boolean(_) => Some(SchemaType::Boolean),
            Self::Absent => None,
        }
    }

    /// Returns `true` for [`Absent`](Self::Absent).
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns the string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Converts this value to `target`, widening integers to numbers.
    ///
    /// Returns `None` when the value does not fit.
    #[must_use]
    pub fn conform_to(self, target: SchemaType) -> Option<Self> {
        match (self, target) {
            (value @ Self::String(_), SchemaType::String)
            | (value @ Self::Integer(_), SchemaType::Integer)
            | (value @ Self::Number(_), SchemaType::Number)
            | (value @ Self::Boolean(_), SchemaType::Boolean) => Some(value),
            (Self::Integer(value), SchemaType::Number) => Some(Self::Number(value as f64)),
            _ => None,
        }
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<f64> for TypedValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for TypedValue {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

macro_rules! impl_from_lossless_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TypedValue {
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::from(value))
                }
            }
        )*
    };
}

impl_from_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_from_saturating_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TypedValue {
                fn from(value: $ty) -> Self {
                    Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
                }
            }
        )*
    };
}

impl_from_saturating_int!(u64, usize);

impl From<isize> for TypedValue {
    fn from(value: isize) -> Self {
        Self::Integer(value as i64)
    }
}

impl<T: Into<TypedValue>> From<Option<T>> for TypedValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        assert_eq!(TypedValue::from("hi"), TypedValue::String("hi".into()));
        assert_eq!(TypedValue::from(7u8), TypedValue::Integer(7));
        assert_eq!(TypedValue::from(u64::MAX), TypedValue::Integer(i64::MAX));
        assert_eq!(TypedValue::from(None::<i32>), TypedValue::Absent);
        assert_eq!(TypedValue::from(Some(true)), TypedValue::Boolean(true));
    }

    #[test]
    fn conform_widens_integers_only() {
        assert_eq!(
            TypedValue::Integer(3).conform_to(SchemaType::Number),
            Some(TypedValue::Number(3.0))
        );
        assert_eq!(TypedValue::Number(3.0).conform_to(SchemaType::Integer), None);
        assert_eq!(TypedValue::Absent.conform_to(SchemaType::String), None);
    }
}
