use std::sync::Arc;

use crate::{
    ast::{Expr, Operator},
    compiler::features::Features,
    error::RuntimeError,
    interpreter::value::core::Value,
    resolver::core::Resolver,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The inputs of one invocation of a compiled expression.
///
/// A context is created per call and borrowed by every evaluation routine.
/// It never changes while the tree is walked, so concurrent invocations each
/// use their own.
pub struct Context<'a> {
    /// Parameter values in declaration order.
    pub params:   &'a [Value],
    /// The resolver captured at compile time, if any.
    pub resolver: Option<&'a Arc<dyn Resolver>>,
    /// Features of the compiler that built the tree; they decide the regime
    /// of operators whose operand types are only known now.
    pub features: Features,
}

impl<'a> Context<'a> {
    /// Creates a context over `params` and `resolver`.
    #[must_use]
    pub const fn new(params: &'a [Value],
                     resolver: Option<&'a Arc<dyn Resolver>>,
                     features: Features)
                     -> Self {
        Self { params,
               resolver,
               features }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for evaluation. The evaluator dispatches
    /// based on the node variant: constants, parameters, unary and binary
    /// operators, reads, calls and conversions.
    ///
    /// # Example
    /// ```
    /// use formulary::{
    ///     ast::{Expr, Operator, Regime},
    ///     compiler::features::Features,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let tree = Expr::Arithmetic { op:     Operator::Add,
    ///                               regime: Regime::Integer,
    ///                               left:   Box::new(Expr::Constant(Value::Integer(3))),
    ///                               right:  Box::new(Expr::Constant(Value::Integer(4))), };
    ///
    /// let context = Context::new(&[], None, Features::COMMON);
    /// assert_eq!(context.eval(&tree).unwrap(), Value::Integer(7));
    /// ```
    pub fn eval(&self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Constant(value) => Ok(value.clone()),
            Expr::Parameter { index, ty } => {
                let value = self.params.get(*index).cloned().ok_or_else(|| {
                                RuntimeError::PropertyNotFound { name: format!("parameter #{index}") }
                            })?;
                value.convert(*ty)
            },
            Expr::Negate { operand, regime } => self.eval_negate(operand, *regime),
            Expr::Not(operand) => self.eval_not(operand),
            Expr::Arithmetic { op,
                               regime,
                               left,
                               right, } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                self.eval_arithmetic(*op, *regime, &left, &right)
            },
            Expr::Power { left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::eval_pow(&left, &right)
            },
            Expr::Comparison { op,
                               regime,
                               left,
                               right, } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                self.eval_comparison(*op, *regime, &left, &right)
            },
            Expr::Logical { op, left, right } => self.eval_logic(*op, left, right),
            Expr::Concat { left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                Self::eval_concat(&left, &right)
            },
            Expr::Read { target, name, ty } => self.eval_read(target.as_deref(), name, *ty),
            Expr::Call { target,
                         name,
                         arguments,
                         ty, } => self.eval_call(target.as_deref(), name, arguments, *ty),
            Expr::Convert { expr, to } => self.eval(expr)?.convert(*to),
        }
    }
}

/// Builds the error for operands an operator does not accept at runtime.
pub(crate) fn invalid_operands(op: Operator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidOperands { operator: op.symbol().to_string(),
                                    left:     left.value_type(),
                                    right:    right.value_type(), }
}

/// Builds the error for a prefix operand an operator does not accept at
/// runtime.
pub(crate) fn invalid_operand(op: Operator, operand: &Value) -> RuntimeError {
    RuntimeError::InvalidOperand { operator: op.symbol().to_string(),
                                   found:    operand.value_type(), }
}
