use crate::{ast::Regime, compiler::features::Features, interpreter::value::core::ValueType};

/// Chooses the arithmetic regime for two numeric operand types.
///
/// The rules are applied in order:
/// 1. both operands are integers and the Integer feature is on: integer,
/// 2. the Decimal feature is on: decimal,
/// 3. otherwise: floating point.
///
/// # Returns
/// `None` if either type is not numeric. `Dynamic` is not numeric here;
/// callers decide what to do with it before asking.
///
/// # Example
/// ```
/// use formulary::{
///     ast::Regime,
///     compiler::features::Features,
///     interpreter::{evaluator::binary::core::numeric_regime, value::core::ValueType},
/// };
///
/// let int = ValueType::Integer;
/// let float = ValueType::Float;
///
/// assert_eq!(numeric_regime(Features::COMMON, int, int), Some(Regime::Integer));
/// assert_eq!(numeric_regime(Features::COMMON, int, float), Some(Regime::Float));
/// assert_eq!(numeric_regime(Features::ALL, int, float), Some(Regime::Decimal));
/// assert_eq!(numeric_regime(Features::MINIMAL, int, int), Some(Regime::Float));
/// assert_eq!(numeric_regime(Features::COMMON, int, ValueType::Bool), None);
/// ```
#[must_use]
pub const fn numeric_regime(features: Features,
                            left: ValueType,
                            right: ValueType)
                            -> Option<Regime> {
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }

    if matches!((left, right), (ValueType::Integer, ValueType::Integer))
       && features.contains(Features::INTEGER)
    {
        Some(Regime::Integer)
    } else if features.contains(Features::DECIMAL) {
        Some(Regime::Decimal)
    } else {
        Some(Regime::Float)
    }
}

/// Chooses the comparison regime for two operand types.
///
/// Numbers compare in their arithmetic regime, two booleans or two strings
/// compare as such. `Dynamic` on either side defers the choice to runtime.
///
/// # Returns
/// `None` for pairs that can never be compared.
#[must_use]
pub const fn comparison_regime(features: Features,
                               left: ValueType,
                               right: ValueType)
                               -> Option<Regime> {
    match (left, right) {
        (ValueType::Dynamic, _) | (_, ValueType::Dynamic) => Some(Regime::Dynamic),
        (ValueType::Bool, ValueType::Bool) => Some(Regime::Bool),
        (ValueType::String, ValueType::String) => Some(Regime::String),
        _ => numeric_regime(features, left, right),
    }
}
