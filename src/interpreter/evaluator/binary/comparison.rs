use std::cmp::Ordering;

use crate::{
    ast::{Operator, Regime},
    interpreter::{
        evaluator::{
            binary::core::comparison_regime,
            core::{Context, EvalResult, invalid_operands},
        },
        value::core::Value,
    },
};

/// Maps a comparison operator and the ordering of its operands to the
/// boolean result.
///
/// `None` stands for unordered operands (a NaN is involved): only `!=`
/// holds then.
#[must_use]
pub fn ordering_result(op: Operator, ordering: Option<Ordering>) -> bool {
    use Ordering::{Equal, Greater, Less};

    match op {
        Operator::Equal => ordering == Some(Equal),
        Operator::NotEqual => ordering != Some(Equal),
        Operator::Greater => ordering == Some(Greater),
        Operator::Less => ordering == Some(Less),
        Operator::GreaterEqual => matches!(ordering, Some(Greater | Equal)),
        Operator::LessEqual => matches!(ordering, Some(Less | Equal)),
        _ => unreachable!("ordering_result used with non comparison operator"),
    }
}

impl Context<'_> {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// Numeric regimes convert both operands first, so `2 == 2.0` holds.
    /// Booleans support equality only; strings also order
    /// lexicographically. A `Dynamic` regime picks one of those from the
    /// runtime types.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `regime`: Regime chosen when the tree was built.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    ///
    /// # Returns
    /// A boolean value.
    ///
    /// # Example
    /// ```
    /// use formulary::{
    ///     ast::{Operator, Regime},
    ///     compiler::features::Features,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new(&[], None, Features::COMMON);
    ///
    /// let result = context.eval_comparison(Operator::Less,
    ///                                      Regime::Float,
    ///                                      &Value::Integer(3),
    ///                                      &Value::Float(5.0));
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    ///
    /// let result = context.eval_comparison(Operator::Equal,
    ///                                      Regime::Dynamic,
    ///                                      &Value::from("a"),
    ///                                      &Value::Integer(1));
    /// assert!(result.is_err());
    /// ```
    pub fn eval_comparison(&self,
                           op: Operator,
                           regime: Regime,
                           left: &Value,
                           right: &Value)
                           -> EvalResult<Value> {
        let ordering = match regime {
            Regime::Integer => Some(left.as_integer()?.cmp(&right.as_integer()?)),
            Regime::Decimal => Some(left.as_decimal()?.cmp(&right.as_decimal()?)),
            Regime::Float => left.as_float()?.partial_cmp(&right.as_float()?),
            Regime::String => Some(left.as_str()?.cmp(right.as_str()?)),
            Regime::Bool => {
                if !matches!(op, Operator::Equal | Operator::NotEqual) {
                    return Err(invalid_operands(op, left, right));
                }
                Some(left.as_bool()?.cmp(&right.as_bool()?))
            },
            Regime::Dynamic => {
                let regime = comparison_regime(self.features, left.value_type(), right.value_type())
                    .filter(|regime| *regime != Regime::Dynamic)
                    .ok_or_else(|| invalid_operands(op, left, right))?;
                return self.eval_comparison(op, regime, left, right);
            },
        };

        Ok(Value::Bool(ordering_result(op, ordering)))
    }
}
