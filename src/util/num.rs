use std::str::FromStr;

use rust_decimal::{Decimal, prelude::ToPrimitive};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::ValueType},
};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Widens an `i64` operand to the nearest `f64`.
///
/// Floating point arithmetic takes integer operands as they are, rounding
/// magnitudes above `2^53` like any other double.
///
/// ## Example
/// ```
/// use formulary::util::num::widen_to_f64;
///
/// assert_eq!(widen_to_f64(-3), -3.0);
/// assert_eq!(widen_to_f64((1 << 53) + 1), 9_007_199_254_740_992.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn widen_to_f64(value: i64) -> f64 {
    value as f64
}

/// Safely converts an `i64` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns a conversion error if the value exceeds `MAX_SAFE_U64_INT` in
/// absolute value.
///
/// ## Example
/// ```
/// use formulary::util::num::i64_to_f64_checked;
///
/// assert_eq!(i64_to_f64_checked(42).unwrap(), 42.0);
/// assert!(i64_to_f64_checked((1 << 53) + 1).is_err());
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn i64_to_f64_checked(value: i64) -> EvalResult<f64> {
    if value.unsigned_abs() > MAX_SAFE_U64_INT {
        return Err(RuntimeError::conversion(ValueType::Integer,
                                            ValueType::Float,
                                            format!("{value} is not exactly representable")));
    }
    Ok(value as f64)
}

/// Safely converts an `f64` to `i64` if the value is finite, within range,
/// and not fractional.
///
/// ## Errors
/// Returns a conversion error for non-finite, out-of-range, or fractional
/// values.
///
/// ## Example
/// ```
/// use formulary::util::num::f64_to_i64_checked;
///
/// assert_eq!(f64_to_i64_checked(1000.0).unwrap(), 1000);
/// assert!(f64_to_i64_checked(1.5).is_err());
/// assert!(f64_to_i64_checked(1e20).is_err());
/// assert!(f64_to_i64_checked(f64::NAN).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64) -> EvalResult<i64> {
    let fail = |details: &str| {
        RuntimeError::conversion(ValueType::Float, ValueType::Integer, format!("{value} {details}"))
    };

    if !value.is_finite() {
        return Err(fail("is not finite"));
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(fail("is out of range"));
    }
    if value.fract() != 0.0 {
        return Err(fail("is fractional"));
    }
    Ok(value as i64)
}

/// Converts an `f64` to a [`Decimal`] through its shortest round-trip text.
///
/// `0.1` therefore becomes exactly `0.1` rather than the binary expansion of
/// the nearest double.
///
/// ## Errors
/// Returns a conversion error for non-finite values and magnitudes a
/// `Decimal` cannot hold.
///
/// ## Example
/// ```
/// use std::str::FromStr;
///
/// use formulary::util::num::f64_to_decimal_checked;
/// use rust_decimal::Decimal;
///
/// assert_eq!(f64_to_decimal_checked(0.1).unwrap(), Decimal::from_str("0.1").unwrap());
/// assert!(f64_to_decimal_checked(f64::INFINITY).is_err());
/// assert!(f64_to_decimal_checked(1e300).is_err());
/// ```
pub fn f64_to_decimal_checked(value: f64) -> EvalResult<Decimal> {
    if !value.is_finite() {
        return Err(RuntimeError::conversion(ValueType::Float,
                                            ValueType::Decimal,
                                            format!("{value} is not finite")));
    }

    Decimal::from_str(&value.to_string()).map_err(|e| {
                                             RuntimeError::conversion(ValueType::Float,
                                                                      ValueType::Decimal,
                                                                      e.to_string())
                                         })
}

/// Converts a [`Decimal`] to the nearest `f64`.
///
/// ## Errors
/// Returns a conversion error if the decimal has no `f64` approximation.
pub fn decimal_to_f64_checked(value: Decimal) -> EvalResult<f64> {
    value.to_f64().ok_or_else(|| {
                      RuntimeError::conversion(ValueType::Decimal,
                                               ValueType::Float,
                                               format!("{value} has no float approximation"))
                  })
}

/// Converts a [`Decimal`] to `i64` if it is integral and within range.
///
/// ## Errors
/// Returns a conversion error for fractional or out-of-range values.
///
/// ## Example
/// ```
/// use formulary::util::num::decimal_to_i64_checked;
/// use rust_decimal::Decimal;
///
/// assert_eq!(decimal_to_i64_checked(Decimal::new(4200, 2)).unwrap(), 42);
/// assert!(decimal_to_i64_checked(Decimal::new(425, 1)).is_err());
/// ```
pub fn decimal_to_i64_checked(value: Decimal) -> EvalResult<i64> {
    if !value.fract().is_zero() {
        return Err(RuntimeError::conversion(ValueType::Decimal,
                                            ValueType::Integer,
                                            format!("{value} is fractional")));
    }

    value.to_i64().ok_or_else(|| {
                      RuntimeError::conversion(ValueType::Decimal,
                                               ValueType::Integer,
                                               format!("{value} is out of range"))
                  })
}

/// Narrows an `i64` to a host integer width.
///
/// `target` names the host type for the error message.
///
/// ## Errors
/// Returns a conversion error if `value` does not fit in `T`.
///
/// ## Example
/// ```
/// use formulary::util::num::narrow_integer;
///
/// let small: u8 = narrow_integer(200, "u8").unwrap();
/// assert_eq!(small, 200);
/// assert!(narrow_integer::<u8>(-1, "u8").is_err());
/// assert!(narrow_integer::<i32>(i64::MAX, "i32").is_err());
/// ```
pub fn narrow_integer<T: TryFrom<i64>>(value: i64, target: &str) -> EvalResult<T> {
    T::try_from(value).map_err(|_| {
                          RuntimeError::conversion(ValueType::Integer,
                                                   ValueType::Integer,
                                                   format!("{value} does not fit in {target}"))
                      })
}

/// Widens a host integer of any width to `i64`.
///
/// ## Errors
/// Returns a conversion error for unsigned values above `i64::MAX`.
pub fn widen_integer<T: TryInto<i64> + Copy + std::fmt::Display>(value: T) -> EvalResult<i64> {
    value.try_into().map_err(|_| {
                        RuntimeError::conversion(ValueType::Integer,
                                                 ValueType::Integer,
                                                 format!("{value} does not fit in i64"))
                    })
}
