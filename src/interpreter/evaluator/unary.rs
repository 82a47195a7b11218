use crate::{
    ast::{Expr, Operator, Regime},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::numeric_regime,
            core::{Context, EvalResult, invalid_operand},
        },
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates prefix minus in the given regime.
    ///
    /// A `Dynamic` operand picks its regime from the runtime type, using the
    /// same rules as binary arithmetic with the operand on both sides.
    ///
    /// # Parameters
    /// - `operand`: The negated expression.
    /// - `regime`: Regime chosen when the tree was built.
    ///
    /// # Returns
    /// The negated value.
    ///
    /// # Example
    /// ```
    /// use formulary::{
    ///     ast::{Expr, Regime},
    ///     compiler::features::Features,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new(&[], None, Features::COMMON);
    ///
    /// let five = Expr::Constant(Value::Integer(5));
    /// assert_eq!(context.eval_negate(&five, Regime::Integer).unwrap(), Value::Integer(-5));
    ///
    /// let min = Expr::Constant(Value::Integer(i64::MIN));
    /// assert!(context.eval_negate(&min, Regime::Integer).is_err());
    /// ```
    pub fn eval_negate(&self, operand: &Expr, regime: Regime) -> EvalResult<Value> {
        let value = self.eval(operand)?;
        self.negate(&value, regime)
    }

    fn negate(&self, value: &Value, regime: Regime) -> EvalResult<Value> {
        match regime {
            Regime::Integer => {
                value.as_integer()?
                     .checked_neg()
                     .map(Value::Integer)
                     .ok_or_else(|| RuntimeError::Overflow { operator: "-".to_string() })
            },
            Regime::Decimal => Ok(Value::Decimal(-value.as_decimal()?)),
            Regime::Float => Ok(Value::Float(-value.as_float()?)),
            Regime::Dynamic => {
                let ty = value.value_type();
                let Some(regime) = numeric_regime(self.features, ty, ty) else {
                    return Err(invalid_operand(Operator::UnaryMinus, value));
                };
                self.negate(value, regime)
            },
            Regime::Bool | Regime::String => Err(invalid_operand(Operator::UnaryMinus, value)),
        }
    }

    /// Evaluates logical not.
    ///
    /// # Errors
    /// A conversion error if the operand is not a boolean, which only
    /// happens for operands typed `Dynamic` when the tree was built.
    pub fn eval_not(&self, operand: &Expr) -> EvalResult<Value> {
        Ok(Value::Bool(!self.eval(operand)?.as_bool()?))
    }
}
