/// Numeric conversion helpers.
///
/// This module provides checked conversions between the numeric regimes
/// (`i64`, `f64`, [`Decimal`](rust_decimal::Decimal)) and the host integer
/// widths. Use these helpers whenever a value crosses from one numeric type
/// to another so that precision loss is reported instead of hidden.
///
/// The checked functions return a `Result`, which is `Ok` if the conversion
/// is lossless and valid, or a conversion error otherwise. `widen_to_f64`
/// is the one rounding conversion, used for floating point operands.
pub mod num;
