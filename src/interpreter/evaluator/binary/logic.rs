use crate::{
    ast::{Expr, Operator},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context<'_> {
    /// Evaluates `&&` or `||` with short-circuiting.
    ///
    /// The right operand is only evaluated when the left one does not decide
    /// the result, so `false && f()` never calls `f`.
    ///
    /// # Example
    /// ```
    /// use formulary::{
    ///     ast::{Expr, Operator},
    ///     compiler::features::Features,
    ///     interpreter::{
    ///         evaluator::core::Context,
    ///         value::core::{Value, ValueType},
    ///     },
    /// };
    ///
    /// let context = Context::new(&[], None, Features::COMMON);
    ///
    /// // The right side would fail as a property read without a resolver.
    /// let missing = Expr::Read { target: None,
    ///                            name:   "missing".to_string(),
    ///                            ty:     ValueType::Bool, };
    /// let truth = Expr::Constant(Value::Bool(true));
    ///
    /// let v = context.eval_logic(Operator::Or, &truth, &missing).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    /// ```
    pub fn eval_logic(&self, op: Operator, left: &Expr, right: &Expr) -> EvalResult<Value> {
        let left = self.eval(left)?.as_bool()?;

        Ok(Value::Bool(match op {
                           Operator::And => left && self.eval(right)?.as_bool()?,
                           Operator::Or => left || self.eval(right)?.as_bool()?,
                           _ => unreachable!("eval_logic used with non logical operator"),
                       }))
    }
}
