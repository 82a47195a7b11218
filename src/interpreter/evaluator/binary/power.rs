use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    value::core::Value,
};

impl Context<'_> {
    /// Evaluates `left ^ right`.
    ///
    /// Both operands are widened to `f64` whatever the regime of the
    /// surrounding expression, and the result is always a float.
    ///
    /// # Example
    /// ```
    /// use formulary::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let v = Context::eval_pow(&Value::Integer(2), &Value::Integer(10)).unwrap();
    /// assert_eq!(v, Value::Float(1024.0));
    /// ```
    pub fn eval_pow(left: &Value, right: &Value) -> EvalResult<Value> {
        Ok(Value::Float(left.as_float()?.powf(right.as_float()?)))
    }
}
