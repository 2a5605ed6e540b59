//! Validation and coercion of raw arguments against declared parameters.

use crate::args::{ArgValue, ArgumentBag};
use crate::error::DispatchError;
use crate::handler::Arguments;
use lodestar_schema::{EnumTable, Enumeration, SchemaType, ToolParameter, TypedValue};

/// Coerces an [`ArgumentBag`] into positional [`Arguments`].
///
/// Holds no per-call state: one coercer can serve any number of concurrent
/// calls.
#[derive(Debug, Clone, Copy)]
pub struct ArgumentCoercer<'a> {
    enums: &'a EnumTable,
}

impl<'a> ArgumentCoercer<'a> {
    /// Creates a coercer that resolves deferred enums through `enums`.
    #[must_use]
    pub fn new(enums: &'a EnumTable) -> Self {
        Self { enums }
    }

    /// Coerces `bag` against `parameters`, in declaration order.
    ///
    /// The first failing parameter is reported. Keys in `bag` that match no
    /// parameter are ignored.
    pub fn coerce(
        &self,
        parameters: &[ToolParameter],
        bag: &ArgumentBag,
    ) -> Result<Arguments, DispatchError> {
        let mut arguments = Arguments::with_capacity(parameters.len());

        for param in parameters {
            let value = match bag.get(&param.name).filter(|value| !value.is_null()) {
                Some(raw) => self.coerce_value(param, raw)?,
                None if param.optional => param.default_value.clone().unwrap_or(TypedValue::Absent),
                None => return Err(DispatchError::MissingArgument(param.name.clone())),
            };
            tracing::trace!(parameter = %param.name, value = ?value, "coerced argument");
            arguments.push(param.name.clone(), value);
        }

        for key in bag.keys() {
            if !parameters.iter().any(|param| param.name == key) {
                tracing::debug!(argument = %key, "ignoring undeclared argument");
            }
        }

        Ok(arguments)
    }

    fn coerce_value(
        &self,
        param: &ToolParameter,
        raw: &ArgValue,
    ) -> Result<TypedValue, DispatchError> {
        let mismatch = || DispatchError::type_mismatch(&param.name, param.schema_type, raw.kind());

        let value = match (param.schema_type, raw) {
            (SchemaType::String, ArgValue::String(value)) => TypedValue::String(value.clone()),
            (SchemaType::Boolean, ArgValue::Bool(value)) => TypedValue::Boolean(*value),
            (SchemaType::Integer, ArgValue::Integer(value)) => TypedValue::Integer(*value),
            (SchemaType::Integer, ArgValue::Float(value)) => {
                TypedValue::Integer(integral(*value).ok_or_else(mismatch)?)
            }
            (SchemaType::Number, ArgValue::Float(value)) => TypedValue::Number(*value),
            (SchemaType::Number, ArgValue::Integer(value)) => TypedValue::Number(*value as f64),
            _ => return Err(mismatch()),
        };

        if let TypedValue::String(case) = &value {
            self.check_case(param, case)?;
        }
        Ok(value)
    }

    fn check_case(&self, param: &ToolParameter, case: &str) -> Result<(), DispatchError> {
        let cases = match &param.enumeration {
            None => return Ok(()),
            Some(Enumeration::Cases(cases)) => cases.as_slice(),
            Some(Enumeration::Deferred(key)) => self
                .enums
                .get(key)
                .ok_or_else(|| DispatchError::UnsupportedType(key.clone()))?,
        };
        if cases.iter().any(|allowed| allowed == case) {
            Ok(())
        } else {
            Err(DispatchError::invalid_enum_value(&param.name, case))
        }
    }
}

/// Returns `value` as an `i64` when it is finite, has no fractional part and
/// fits the range.
fn integral(value: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    (value.is_finite() && value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value))
        .then(|| value as i64)
}
