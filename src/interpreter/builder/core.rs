use std::sync::Arc;

use crate::{
    ast::{Expr, Node},
    compiler::features::Features,
    error::CompileError,
    interpreter::value::core::{Value, ValueType},
    resolver::core::Resolver,
};

/// Result type used by the builder.
pub type BuildResult<T> = Result<T, CompileError>;

/// A formal input of a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// The name expressions refer to it by.
    pub name: String,
    /// The declared host type.
    pub ty:   ValueType,
}

impl Parameter {
    /// Creates a parameter descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: ValueType) -> Self {
        Self { name: name.into(),
               ty }
    }
}

/// Turns a postfix program into a typed expression tree.
///
/// The builder borrows the parameters and the resolver of one `compile`
/// call and is discarded afterwards.
pub struct Builder<'a> {
    pub(crate) stack:      Vec<Expr>,
    pub(crate) parameters: &'a [Parameter],
    pub(crate) resolver:   Option<&'a Arc<dyn Resolver>>,
    pub(crate) features:   Features,
}

impl<'a> Builder<'a> {
    /// Creates a builder for one program.
    #[must_use]
    pub const fn new(parameters: &'a [Parameter],
                     resolver: Option<&'a Arc<dyn Resolver>>,
                     features: Features)
                     -> Self {
        Self { stack: Vec::new(),
               parameters,
               resolver,
               features }
    }

    /// Consumes one postfix node.
    pub fn push(&mut self, node: &Node) -> BuildResult<()> {
        let expr = match node {
            Node::Integer(n) => Expr::Constant(Value::Integer(*n)),
            Node::Float(r) => Expr::Constant(Value::Float(*r)),
            Node::Bool(b) => Expr::Constant(Value::Bool(*b)),
            Node::Str(s) => Expr::Constant(Value::from(s.as_str())),
            Node::Operator(op) => self.build_operator(*op)?,
            Node::Function { name, arity } => self.build_call(name, *arity)?,
            Node::Variable(name) => self.build_variable(name)?,
        };

        self.stack.push(expr);
        Ok(())
    }

    /// Takes the single remaining tree and coerces it to `returns`.
    ///
    /// # Errors
    /// [`CompileError::MalformedProgram`] if the program did not reduce to
    /// exactly one tree, and [`CompileError::IncompatibleResult`] if the tree
    /// can never produce a `returns` value.
    pub fn finish(mut self, returns: ValueType) -> BuildResult<Expr> {
        let Some(expr) = self.stack.pop() else {
            return Err(malformed("the program produces no value".to_string()));
        };

        if !self.stack.is_empty() {
            return Err(malformed(format!("{} values left over", self.stack.len())));
        }

        coerce(expr, returns)
    }

    /// Pops the operand on top of the stack.
    pub(crate) fn pop(&mut self) -> BuildResult<Expr> {
        self.stack.pop().ok_or_else(|| malformed("missing operand".to_string()))
    }

    /// Pops the `count` topmost operands, in source order.
    pub(crate) fn pop_many(&mut self, count: usize) -> BuildResult<Vec<Expr>> {
        if self.stack.len() < count {
            return Err(malformed(format!("expected {count} arguments, found {}",
                                         self.stack.len())));
        }

        Ok(self.stack.split_off(self.stack.len() - count))
    }
}

const fn malformed(details: String) -> CompileError {
    CompileError::MalformedProgram { details }
}

/// Wraps `expr` in a conversion to `ty` unless it already has that type.
///
/// Conversions that can fail for some values, such as `Float` to
/// `Integer`, are checked when the expression runs.
///
/// # Errors
/// [`CompileError::IncompatibleResult`] if no value of the expression's
/// type converts to `ty`.
///
/// # Example
/// ```
/// use formulary::{
///     ast::Expr,
///     interpreter::{
///         builder::core::coerce,
///         value::core::{Value, ValueType},
///     },
/// };
///
/// let two = Expr::Constant(Value::Integer(2));
/// assert_eq!(coerce(two.clone(), ValueType::Float).unwrap().value_type(), ValueType::Float);
/// assert!(coerce(two, ValueType::Bool).is_err());
/// ```
pub fn coerce(expr: Expr, ty: ValueType) -> BuildResult<Expr> {
    let found = expr.value_type();

    if found == ty || ty == ValueType::Dynamic {
        Ok(expr)
    } else if found.converts_to(ty) {
        Ok(Expr::Convert { expr: Box::new(expr),
                           to:   ty, })
    } else {
        Err(CompileError::IncompatibleResult { found,
                                               expected: ty })
    }
}

/// Builds the typed tree of a postfix program.
///
/// # Parameters
/// - `nodes`: The program produced by the parser.
/// - `returns`: The declared result type.
/// - `parameters`: The formal inputs, in call order.
/// - `resolver`: The resolver captured by the compiled expression.
/// - `features`: The features the program was compiled with.
///
/// # Example
/// ```
/// use formulary::{
///     compiler::features::Features,
///     interpreter::{
///         builder::core::{Parameter, build},
///         lexer::tokenize,
///         parser::core::parse,
///         value::core::ValueType,
///     },
/// };
///
/// let tokens = tokenize("x * 2", Features::COMMON).unwrap();
/// let nodes = parse(&tokens).unwrap();
/// let params = [Parameter::new("x", ValueType::Integer)];
///
/// let tree = build(&nodes, ValueType::Float, &params, None, Features::COMMON).unwrap();
/// assert_eq!(tree.value_type(), ValueType::Float);
/// ```
pub fn build(nodes: &[Node],
             returns: ValueType,
             parameters: &[Parameter],
             resolver: Option<&Arc<dyn Resolver>>,
             features: Features)
             -> BuildResult<Expr> {
    let mut builder = Builder::new(parameters, resolver, features);

    for node in nodes {
        builder.push(node)?;
    }

    let expr = builder.finish(returns)?;
    log::debug!("built {} expression", expr.value_type());
    Ok(expr)
}
