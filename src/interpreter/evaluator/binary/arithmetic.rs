use rust_decimal::Decimal;

use crate::{
    ast::{Operator, Regime},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::numeric_regime,
            core::{Context, EvalResult, invalid_operands},
        },
        value::core::Value,
    },
};

fn overflow(op: Operator) -> RuntimeError {
    RuntimeError::Overflow { operator: op.symbol().to_string() }
}

impl Context<'_> {
    /// Evaluates `+ - * / %` in the given regime.
    ///
    /// - `Integer`: checked 64-bit arithmetic. Division truncates toward
    ///   zero and the remainder takes the sign of the dividend.
    /// - `Decimal`: checked fixed-point arithmetic.
    /// - `Float`: IEEE-754 double precision, so `1.0 / 0` is infinity.
    /// - `Dynamic`: the regime is chosen from the runtime operand types.
    ///
    /// # Parameters
    /// - `op`: The arithmetic operator.
    /// - `regime`: Regime chosen when the tree was built.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// The computed value, in the representation of the regime.
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
    /// let seven = Value::Integer(-7);
    /// let two = Value::Integer(2);
    ///
    /// let q = context.eval_arithmetic(Operator::Div, Regime::Integer, &seven, &two).unwrap();
    /// assert_eq!(q, Value::Integer(-3));
    ///
    /// let q = context.eval_arithmetic(Operator::Div, Regime::Float, &seven, &two).unwrap();
    /// assert_eq!(q, Value::Float(-3.5));
    ///
    /// let zero = Value::Integer(0);
    /// assert!(context.eval_arithmetic(Operator::Mod, Regime::Integer, &seven, &zero).is_err());
    /// ```
    pub fn eval_arithmetic(&self,
                           op: Operator,
                           regime: Regime,
                           left: &Value,
                           right: &Value)
                           -> EvalResult<Value> {
        match regime {
            Regime::Integer => Self::integer_op(op, left.as_integer()?, right.as_integer()?),
            Regime::Decimal => Self::decimal_op(op, left.as_decimal()?, right.as_decimal()?),
            Regime::Float => Ok(Self::float_op(op, left.as_float()?, right.as_float()?)),
            Regime::Dynamic => {
                let regime = numeric_regime(self.features, left.value_type(), right.value_type())
                    .ok_or_else(|| invalid_operands(op, left, right))?;
                self.eval_arithmetic(op, regime, left, right)
            },
            Regime::Bool | Regime::String => Err(invalid_operands(op, left, right)),
        }
    }

    fn integer_op(op: Operator, left: i64, right: i64) -> EvalResult<Value> {
        use Operator::{Add, Div, Mod, Mul, Sub};

        if matches!(op, Div | Mod) && right == 0 {
            return Err(RuntimeError::DivisionByZero);
        }

        let result = match op {
            Add => left.checked_add(right),
            Sub => left.checked_sub(right),
            Mul => left.checked_mul(right),
            Div => left.checked_div(right),
            Mod => left.checked_rem(right),
            _ => unreachable!("not an arithmetic operator"),
        };

        result.map(Value::Integer).ok_or_else(|| overflow(op))
    }

    fn decimal_op(op: Operator, left: Decimal, right: Decimal) -> EvalResult<Value> {
        use Operator::{Add, Div, Mod, Mul, Sub};

        if matches!(op, Div | Mod) && right.is_zero() {
            return Err(RuntimeError::DivisionByZero);
        }

        let result = match op {
            Add => left.checked_add(right),
            Sub => left.checked_sub(right),
            Mul => left.checked_mul(right),
            Div => left.checked_div(right),
            Mod => left.checked_rem(right),
            _ => unreachable!("not an arithmetic operator"),
        };

        result.map(Value::Decimal).ok_or_else(|| overflow(op))
    }

    fn float_op(op: Operator, left: f64, right: f64) -> Value {
        use Operator::{Add, Div, Mod, Mul, Sub};

        Value::Float(match op {
                         Add => left + right,
                         Sub => left - right,
                         Mul => left * right,
                         Div => left / right,
                         Mod => left % right,
                         _ => unreachable!("not an arithmetic operator"),
                     })
    }
}
