use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueType},
    },
    resolver::core::Resolver,
    util::num::{narrow_integer, widen_integer},
};

/// A host type that can be produced from a runtime [`Value`].
///
/// Implemented for the result type of a compiled evaluator and for the
/// arguments of host functions exposed through a resolver.
pub trait FromValue: Sized {
    /// The static type this host type maps onto.
    const VALUE_TYPE: ValueType;

    /// Converts `value` into the host type, failing if it cannot be
    /// represented.
    fn from_value(value: Value) -> EvalResult<Self>;
}

/// A host type that can be turned into a runtime [`Value`].
///
/// Implemented for the parameter types of a compiled evaluator and for the
/// return values of host functions.
pub trait IntoValue {
    /// The static type this host type maps onto.
    const VALUE_TYPE: ValueType;

    /// Converts the host value into a runtime value.
    fn into_value(self) -> EvalResult<Value>;
}

/// Implements both conversion traits for host integer widths.
///
/// Every width maps onto the single integer family; narrowing back is checked.
macro_rules! integer_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::Integer;

                fn from_value(value: Value) -> EvalResult<Self> {
                    narrow_integer(value.as_integer()?, stringify!($ty))
                }
            }

            impl IntoValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::Integer;

                fn into_value(self) -> EvalResult<Value> {
                    Ok(Value::Integer(widen_integer(self)?))
                }
            }
        )*
    };
}

integer_conversions!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn from_value(value: Value) -> EvalResult<Self> {
        value.as_float()
    }
}

impl IntoValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::Float(self))
    }
}

impl FromValue for f32 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> EvalResult<Self> {
        Ok(value.as_float()? as Self)
    }
}

impl IntoValue for f32 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::Float(f64::from(self)))
    }
}

impl FromValue for Decimal {
    const VALUE_TYPE: ValueType = ValueType::Decimal;

    fn from_value(value: Value) -> EvalResult<Self> {
        value.as_decimal()
    }
}

impl IntoValue for Decimal {
    const VALUE_TYPE: ValueType = ValueType::Decimal;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::Decimal(self))
    }
}

impl FromValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn from_value(value: Value) -> EvalResult<Self> {
        value.as_bool()
    }
}

impl IntoValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::Bool(self))
    }
}

impl FromValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn from_value(value: Value) -> EvalResult<Self> {
        value.stringify()
    }
}

impl IntoValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::String(self.into()))
    }
}

impl IntoValue for &str {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::String(self.into()))
    }
}

impl FromValue for Vec<Value> {
    const VALUE_TYPE: ValueType = ValueType::Array;

    fn from_value(value: Value) -> EvalResult<Self> {
        Ok(value.as_array()?.to_vec())
    }
}

impl IntoValue for Vec<Value> {
    const VALUE_TYPE: ValueType = ValueType::Array;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::Array(self.into()))
    }
}

impl FromValue for Arc<dyn Resolver> {
    const VALUE_TYPE: ValueType = ValueType::Resolver;

    fn from_value(value: Value) -> EvalResult<Self> {
        value.as_resolver().cloned()
    }
}

impl IntoValue for Arc<dyn Resolver> {
    const VALUE_TYPE: ValueType = ValueType::Resolver;

    fn into_value(self) -> EvalResult<Value> {
        Ok(Value::Resolver(self))
    }
}

impl FromValue for Value {
    const VALUE_TYPE: ValueType = ValueType::Dynamic;

    fn from_value(value: Value) -> EvalResult<Self> {
        Ok(value)
    }
}

impl IntoValue for Value {
    const VALUE_TYPE: ValueType = ValueType::Dynamic;

    fn into_value(self) -> EvalResult<Value> {
        Ok(self)
    }
}

/// Extracts the argument at `index` as a host type.
///
/// Host functions registered on a resolver use this to unpack their
/// argument slice.
///
/// # Example
/// ```
/// use formulary::interpreter::value::{convert::argument, core::Value};
///
/// let args = [Value::Integer(4), Value::Float(0.5)];
/// let n: i32 = argument(&args, 0, "scale").unwrap();
/// let f: f64 = argument(&args, 1, "scale").unwrap();
/// assert_eq!((n, f), (4, 0.5));
/// assert!(argument::<f64>(&args, 2, "scale").is_err());
/// ```
pub fn argument<T: FromValue>(args: &[Value], index: usize, function: &str) -> EvalResult<T> {
    let Some(value) = args.get(index) else {
        return Err(RuntimeError::ArgumentCountMismatch { function: function.to_string(),
                                                         expected: format!("at least {}", index + 1),
                                                         found:    args.len(), });
    };

    T::from_value(value.clone())
}
