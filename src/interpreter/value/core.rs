use std::{fmt, sync::Arc};

use rust_decimal::Decimal;

use crate::{
    error::RuntimeError,
    interpreter::evaluator::core::EvalResult,
    resolver::core::Resolver,
    util::num::{
        decimal_to_f64_checked, decimal_to_i64_checked, f64_to_decimal_checked,
        f64_to_i64_checked, i64_to_f64_checked, widen_to_f64,
    },
};

/// The static type of a value.
///
/// Every node of a compiled expression carries one. `Dynamic` stands for
/// "any value": reads and calls whose type the resolver cannot declare, and
/// host parameters typed as [`Value`]. Conversions out of `Dynamic` are
/// checked when the evaluator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// The integer family; every Rust integer width maps here.
    Integer,
    /// Double-precision floating point.
    Float,
    /// Fixed-point decimal.
    Decimal,
    /// `true` or `false`.
    Bool,
    /// Text.
    String,
    /// An ordered list of values, used for variadic arguments.
    Array,
    /// A nested resolver reached through a member path.
    Resolver,
    /// Any value; checked at runtime.
    Dynamic,
}

impl ValueType {
    /// Returns `true` for `Integer`, `Float` and `Decimal`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Float | Self::Decimal)
    }

    /// Returns `true` if a value of this type may convert to `target`.
    ///
    /// `Dynamic` sources always may; the actual value decides at runtime.
    ///
    /// # Example
    /// ```
    /// use formulary::interpreter::value::core::ValueType;
    ///
    /// assert!(ValueType::Integer.converts_to(ValueType::Float));
    /// assert!(ValueType::Bool.converts_to(ValueType::String));
    /// assert!(!ValueType::Bool.converts_to(ValueType::Float));
    /// assert!(ValueType::Dynamic.converts_to(ValueType::Bool));
    /// ```
    #[must_use]
    pub const fn converts_to(self, target: Self) -> bool {
        use ValueType::{Array, Bool, Decimal, Dynamic, Float, Integer, Resolver, String};

        match (self, target) {
            (Dynamic, _) | (_, Dynamic) => true,
            (Integer | Float | Decimal, Integer | Float | Decimal) => true,
            (Integer | Float | Decimal | Bool | String, String) => true,
            (Bool, Bool) | (Array, Array) | (Resolver, Resolver) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Decimal => "decimal",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Array => "array",
            Self::Resolver => "resolver",
            Self::Dynamic => "dynamic",
        };
        f.write_str(name)
    }
}

/// Represents a runtime value flowing through a compiled expression.
///
/// Values are cheap to clone: strings, arrays and resolvers are shared.
#[derive(Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double-precision floating-point number.
    Float(f64),
    /// A fixed-point decimal number.
    Decimal(Decimal),
    /// A boolean.
    Bool(bool),
    /// An immutable string.
    String(Arc<str>),
    /// An immutable list of values.
    Array(Arc<[Self]>),
    /// A resolver exposing further members.
    Resolver(Arc<dyn Resolver>),
}

impl Value {
    /// Returns the type of this value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
            Self::Decimal(_) => ValueType::Decimal,
            Self::Bool(_) => ValueType::Bool,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Resolver(_) => ValueType::Resolver,
        }
    }

    /// Converts the value to `target`, failing if the value cannot be
    /// represented there without loss.
    ///
    /// - numeric to numeric: integers become floats only when exactly
    ///   representable; floats and decimals become integers only when
    ///   integral and in range.
    /// - any scalar to `String`: its display form.
    /// - `Bool`, `Array` and `Resolver` only from themselves.
    /// - anything to `Dynamic`: unchanged.
    ///
    /// # Example
    /// ```
    /// use formulary::interpreter::value::core::{Value, ValueType};
    ///
    /// let v = Value::Integer(3).convert(ValueType::Float).unwrap();
    /// assert_eq!(v, Value::Float(3.0));
    ///
    /// assert!(Value::Float(2.5).convert(ValueType::Integer).is_err());
    /// assert!(Value::Bool(true).convert(ValueType::Integer).is_err());
    /// ```
    pub fn convert(self, target: ValueType) -> EvalResult<Self> {
        let source = self.value_type();
        if source == target || target == ValueType::Dynamic {
            return Ok(self);
        }

        match (self, target) {
            (Self::Integer(i), ValueType::Float) => Ok(Self::Float(i64_to_f64_checked(i)?)),
            (Self::Integer(i), ValueType::Decimal) => Ok(Self::Decimal(Decimal::from(i))),
            (Self::Float(r), ValueType::Integer) => Ok(Self::Integer(f64_to_i64_checked(r)?)),
            (Self::Float(r), ValueType::Decimal) => Ok(Self::Decimal(f64_to_decimal_checked(r)?)),
            (Self::Decimal(d), ValueType::Integer) => {
                Ok(Self::Integer(decimal_to_i64_checked(d)?))
            },
            (Self::Decimal(d), ValueType::Float) => Ok(Self::Float(decimal_to_f64_checked(d)?)),
            (value, ValueType::String) => Ok(Self::String(value.stringify()?.into())),
            (value, _) => {
                Err(RuntimeError::conversion(source,
                                             target,
                                             format!("no conversion exists for {value}")))
            },
        }
    }

    /// Returns the textual form used by string concatenation.
    ///
    /// Arrays and resolvers have no meaningful text and fail.
    pub fn stringify(&self) -> EvalResult<String> {
        match self {
            Self::String(s) => Ok(s.to_string()),
            Self::Integer(_) | Self::Float(_) | Self::Decimal(_) | Self::Bool(_) => {
                Ok(self.to_string())
            },
            Self::Array(_) | Self::Resolver(_) => {
                Err(RuntimeError::NotStringifiable { found: self.value_type() })
            },
        }
    }

    /// Returns the integer payload, converting if possible.
    pub fn as_integer(&self) -> EvalResult<i64> {
        match self {
            Self::Integer(i) => Ok(*i),
            other => match other.clone().convert(ValueType::Integer)? {
                Self::Integer(i) => Ok(i),
                _ => unreachable!("conversion to integer yields an integer"),
            },
        }
    }

    /// Returns the value as an `f64` operand of floating point arithmetic.
    ///
    /// Integers widen to the nearest double; declared conversions go through
    /// [`Value::convert`], which refuses inexact ones.
    pub fn as_float(&self) -> EvalResult<f64> {
        match self {
            Self::Float(r) => Ok(*r),
            Self::Integer(i) => Ok(widen_to_f64(*i)),
            Self::Decimal(d) => decimal_to_f64_checked(*d),
            other => Err(RuntimeError::conversion(other.value_type(),
                                                  ValueType::Float,
                                                  "value is not numeric")),
        }
    }

    /// Returns the value as a [`Decimal`], converting if possible.
    pub fn as_decimal(&self) -> EvalResult<Decimal> {
        match self {
            Self::Decimal(d) => Ok(*d),
            Self::Integer(i) => Ok(Decimal::from(*i)),
            Self::Float(r) => f64_to_decimal_checked(*r),
            other => Err(RuntimeError::conversion(other.value_type(),
                                                  ValueType::Decimal,
                                                  "value is not numeric")),
        }
    }

    /// Returns the boolean payload.
    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RuntimeError::conversion(other.value_type(),
                                                  ValueType::Bool,
                                                  "value is not a boolean")),
        }
    }

    /// Returns the string payload.
    pub fn as_str(&self) -> EvalResult<&str> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(RuntimeError::conversion(other.value_type(),
                                                  ValueType::String,
                                                  "value is not a string")),
        }
    }

    /// Returns the array payload.
    pub fn as_array(&self) -> EvalResult<&[Self]> {
        match self {
            Self::Array(items) => Ok(items),
            other => Err(RuntimeError::conversion(other.value_type(),
                                                  ValueType::Array,
                                                  "value is not an array")),
        }
    }

    /// Returns the nested resolver payload.
    pub fn as_resolver(&self) -> EvalResult<&Arc<dyn Resolver>> {
        match self {
            Self::Resolver(r) => Ok(r),
            other => Err(RuntimeError::conversion(other.value_type(),
                                                  ValueType::Resolver,
                                                  "value exposes no members")),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Decimal(a), Self::Decimal(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Resolver(a), Self::Resolver(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Self::Float(r) => f.debug_tuple("Float").field(r).finish(),
            Self::Decimal(d) => f.debug_tuple("Decimal").field(d).finish(),
            Self::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Self::String(s) => f.debug_tuple("String").field(s).finish(),
            Self::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Self::Resolver(_) => f.write_str("Resolver(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(r) => write!(f, "{r}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => {
                write!(f, "[")?;

                for (index, value) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                write!(f, "]")
            },
            Self::Resolver(_) => write!(f, "<resolver>"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(v.into())
    }
}

impl From<Arc<dyn Resolver>> for Value {
    fn from(v: Arc<dyn Resolver>) -> Self {
        Self::Resolver(v)
    }
}
