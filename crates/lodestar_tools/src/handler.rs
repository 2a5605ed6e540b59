//! Typed handler plumbing.
//!
//! Coercion produces positional [`Arguments`]; a [`Handler`] converts each one
//! into the Rust type its callable expects via [`FromArgument`], awaits the
//! callable and serializes the result into a [`ToolOutput`].

use crate::error::{BoxError, DispatchError};
use core::future::Future;
use core::pin::Pin;
use lodestar_schema::{SchemaType, TypedValue};
use serde::Serialize;
use serde_json::Value;

/// The future returned by a tool invocation.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<ToolOutput, DispatchError>> + Send>>;

/// One coerced argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Parameter name.
    pub name: String,
    /// Coerced value. [`TypedValue::Absent`] for an omitted optional.
    pub value: TypedValue,
}

/// Coerced arguments, one per declared parameter, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<Argument>,
}

impl Arguments {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates an empty list with room for `capacity` arguments.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an argument.
    pub fn push(&mut self, name: impl Into<String>, value: TypedValue) {
        self.entries.push(Argument {
            name: name.into(),
            value,
        });
    }

    /// Returns the value of an argument by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypedValue> {
        self.entries
            .iter()
            .find(|arg| arg.name == name)
            .map(|arg| &arg.value)
    }

    /// Iterates over the arguments in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Argument> {
        self.entries.iter()
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Arguments {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = core::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// The result of a successful tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A JSON value.
    Value(Value),
    /// The callable returned nothing (`()`, `None` or JSON `null`).
    Empty,
}

impl ToolOutput {
    /// Serializes a callable's result.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, DispatchError> {
        Ok(Self::from(serde_json::to_value(value)?))
    }

    /// Returns the JSON value, or `None` for [`Empty`](Self::Empty).
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            Self::Empty => None,
        }
    }

    /// Returns `true` for [`Empty`](Self::Empty).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Converts to JSON, with [`Empty`](Self::Empty) as `null`.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Value(value) => value,
            Self::Empty => Value::Null,
        }
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            value => Self::Value(value),
        }
    }
}

impl Serialize for ToolOutput {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => value.serialize(serializer),
            Self::Empty => serializer.serialize_unit(),
        }
    }
}

/// Conversion from a coerced argument into a callable's parameter type.
///
/// Implemented for `String`, `bool`, the integer and float primitives,
/// `Option<T>`, and enums deriving `ToolEnum`.
pub trait FromArgument: Sized + Send + 'static {
    /// Schema type values of this type are coerced to.
    const SCHEMA_TYPE: SchemaType;

    /// Converts a coerced value. Returns `None` when it does not fit, e.g. an
    /// integer outside the range of `u8`.
    fn from_argument(value: TypedValue) -> Option<Self>;
}

impl FromArgument for String {
    const SCHEMA_TYPE: SchemaType = SchemaType::String;

    fn from_argument(value: TypedValue) -> Option<Self> {
        match value {
            TypedValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl FromArgument for bool {
    const SCHEMA_TYPE: SchemaType = SchemaType::Boolean;

    fn from_argument(value: TypedValue) -> Option<Self> {
        match value {
            TypedValue::Boolean(value) => Some(value),
            _ => None,
        }
    }
}

macro_rules! impl_from_argument_int {
    ($($ty:ty),*) => {
        $(
            impl FromArgument for $ty {
                const SCHEMA_TYPE: SchemaType = SchemaType::Integer;

                fn from_argument(value: TypedValue) -> Option<Self> {
                    match value {
                        TypedValue::Integer(value) => <$ty>::try_from(value).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_argument_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromArgument for f64 {
    const SCHEMA_TYPE: SchemaType = SchemaType::Number;

    fn from_argument(value: TypedValue) -> Option<Self> {
        match value {
            TypedValue::Number(value) => Some(value),
            TypedValue::Integer(value) => Some(value as f64),
            _ => None,
        }
    }
}

impl FromArgument for f32 {
    const SCHEMA_TYPE: SchemaType = SchemaType::Number;

    fn from_argument(value: TypedValue) -> Option<Self> {
        f64::from_argument(value).map(|value| value as f32)
    }
}

impl<T: FromArgument> FromArgument for Option<T> {
    const SCHEMA_TYPE: SchemaType = T::SCHEMA_TYPE;

    fn from_argument(value: TypedValue) -> Option<Self> {
        match value {
            TypedValue::Absent => Some(None),
            value => T::from_argument(value).map(Some),
        }
    }
}

fn extract<T: FromArgument>(argument: Option<Argument>) -> Result<T, DispatchError> {
    let Argument { name, value } = argument.ok_or_else(|| {
        DispatchError::MalformedArguments(
            "handler expects more arguments than were declared".into(),
        )
    })?;
    let found = match &value {
        TypedValue::Absent => "nothing",
        TypedValue::Integer(_) => "an integer out of range",
        TypedValue::Number(_) => "a number",
        TypedValue::String(_) => "a string",
        TypedValue::Boolean(_) => "a boolean",
    };
    T::from_argument(value).ok_or_else(|| DispatchError::type_mismatch(name, T::SCHEMA_TYPE, found))
}

/// An async callable that can back a tool.
///
/// Implemented for every `Fn(A1, ..., An) -> impl Future<Output = Result<R, E>>`
/// with up to eight arguments, where each `Ai: FromArgument`, `R: Serialize`
/// and `E` converts into a [`BoxError`]. `Args` is the tuple of argument types
/// and only serves to tell the impls apart.
pub trait Handler<Args>: Clone + Send + Sync + 'static {
    /// Number of arguments the callable takes.
    const ARITY: usize;

    /// Converts `args` and invokes the callable.
    fn call(&self, args: Arguments) -> ToolFuture;
}

impl<F, Fut, R, E> Handler<()> for F
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    R: Serialize + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    const ARITY: usize = 0;

    fn call(&self, _args: Arguments) -> ToolFuture {
        let handler = self.clone();
        Box::pin(async move {
            let output = handler().await.map_err(DispatchError::failed)?;
            ToolOutput::from_serialize(&output)
        })
    }
}

macro_rules! impl_handler {
    ($arity:literal; $($ty:ident $var:ident),+) => {
        impl<F, Fut, R, E, $($ty,)+> Handler<($($ty,)+)> for F
        where
            F: Fn($($ty),+) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Result<R, E>> + Send + 'static,
            R: Serialize + Send + 'static,
            E: Into<BoxError> + Send + 'static,
            $($ty: FromArgument,)+
        {
            const ARITY: usize = $arity;

            fn call(&self, args: Arguments) -> ToolFuture {
                let handler = self.clone();
                Box::pin(async move {
                    let mut args = args.into_iter();
                    $(let $var = extract::<$ty>(args.next())?;)+
                    let output = handler($($var),+).await.map_err(DispatchError::failed)?;
                    ToolOutput::from_serialize(&output)
                })
            }
        }
    };
}

impl_handler!(1; T1 a1);
impl_handler!(2; T1 a1, T2 a2);
impl_handler!(3; T1 a1, T2 a2, T3 a3);
impl_handler!(4; T1 a1, T2 a2, T3 a3, T4 a4);
impl_handler!(5; T1 a1, T2 a2, T3 a3, T4 a4, T5 a5);
impl_handler!(6; T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6);
impl_handler!(7; T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7);
impl_handler!(8; T1 a1, T2 a2, T3 a3, T4 a4, T5 a5, T6 a6, T7 a7, T8 a8);

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;

    #[test]
    fn null_and_unit_are_empty() {
        assert_eq!(ToolOutput::from_serialize(&()).unwrap(), ToolOutput::Empty);
        assert_eq!(
            ToolOutput::from_serialize(&None::<i32>).unwrap(),
            ToolOutput::Empty
        );
        assert_eq!(
            ToolOutput::from_serialize(&5).unwrap(),
            ToolOutput::Value(serde_json::json!(5))
        );
    }

    #[test]
    fn integer_conversions_check_range() {
        assert_eq!(u8::from_argument(TypedValue::Integer(255)), Some(255));
        assert_eq!(u8::from_argument(TypedValue::Integer(256)), None);
        assert_eq!(f64::from_argument(TypedValue::Integer(2)), Some(2.0));
        assert_eq!(
            Option::<String>::from_argument(TypedValue::Absent),
            Some(None)
        );
    }

    #[tokio::test]
    async fn handler_receives_arguments_in_order() {
        async fn sub(a: i64, b: i64) -> Result<i64, Infallible> {
            Ok(a - b)
        }

        let mut args = Arguments::new();
        args.push("a", TypedValue::Integer(10));
        args.push("b", TypedValue::Integer(4));

        let output = Handler::<(i64, i64)>::call(&sub, args).await.unwrap();
        assert_eq!(output, ToolOutput::Value(serde_json::json!(6)));
    }

    #[tokio::test]
    async fn out_of_range_integer_is_a_type_mismatch() {
        async fn shout(times: u8) -> Result<String, Infallible> {
            Ok("!".repeat(times.into()))
        }

        let mut args = Arguments::new();
        args.push("times", TypedValue::Integer(1000));
        let err = Handler::<(u8,)>::call(&shout, args).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::TypeMismatch { ref parameter, .. } if parameter == "times"
        ));
    }
}
