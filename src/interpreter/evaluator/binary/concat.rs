use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    value::core::Value,
};

impl Context<'_> {
    /// Evaluates `left .. right` by joining the display forms of both
    /// operands.
    ///
    /// # Errors
    /// [`crate::error::RuntimeError::NotStringifiable`] for arrays and
    /// resolvers reached through `Dynamic` operands.
    ///
    /// # Example
    /// ```
    /// use formulary::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let v = Context::eval_concat(&Value::from("n = "), &Value::Integer(3)).unwrap();
    /// assert_eq!(v, Value::from("n = 3"));
    /// ```
    pub fn eval_concat(left: &Value, right: &Value) -> EvalResult<Value> {
        let mut joined = left.stringify()?;
        joined.push_str(&right.stringify()?);
        Ok(Value::from(joined))
    }
}
