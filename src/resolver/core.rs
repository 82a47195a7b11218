use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueType},
    },
};

/// The declared shape of a host function.
///
/// A function takes a fixed list of typed parameters, optionally followed by
/// a variadic tail whose arguments are packed into one trailing array.
///
/// # Example
/// ```
/// use formulary::{interpreter::value::core::ValueType, resolver::core::FunctionSignature};
///
/// let max = FunctionSignature::new([ValueType::Float], ValueType::Float).variadic(ValueType::Float);
/// assert!(max.accepts(1));
/// assert!(max.accepts(5));
/// assert!(!max.accepts(0));
/// assert_eq!(max.arity(), "at least 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Types of the fixed parameters, in order.
    pub parameters: Vec<ValueType>,
    /// Element type of the variadic tail, if the function has one.
    pub rest:       Option<ValueType>,
    /// The declared return type.
    pub returns:    ValueType,
}

impl FunctionSignature {
    /// Creates a signature with fixed parameters only.
    pub fn new(parameters: impl Into<Vec<ValueType>>, returns: ValueType) -> Self {
        Self { parameters: parameters.into(),
               rest: None,
               returns }
    }

    /// Adds a variadic tail of `element` typed arguments.
    #[must_use]
    pub fn variadic(mut self, element: ValueType) -> Self {
        self.rest = Some(element);
        self
    }

    /// Returns `true` if a call with `count` arguments is well formed.
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        if self.rest.is_some() {
            count >= self.parameters.len()
        } else {
            count == self.parameters.len()
        }
    }

    /// Returns the type the argument at `index` is coerced to.
    #[must_use]
    pub fn parameter_type(&self, index: usize) -> ValueType {
        self.parameters
            .get(index)
            .copied()
            .or(self.rest)
            .unwrap_or(ValueType::Dynamic)
    }

    /// Human readable arity, used in error messages.
    #[must_use]
    pub fn arity(&self) -> String {
        if self.rest.is_some() {
            format!("at least {}", self.parameters.len())
        } else {
            self.parameters.len().to_string()
        }
    }
}

impl fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;

        for (index, ty) in self.parameters.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{ty}")?;
        }

        if let Some(rest) = self.rest {
            if !self.parameters.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "{rest}...")?;
        }

        write!(f, ") -> {}", self.returns)
    }
}

/// Resolves names that are not parameters of a compiled expression.
///
/// A resolver exposes host properties and functions by name. Compiled
/// evaluators capture the resolver they were compiled with and call into it on
/// every invocation, possibly from several threads at once, so
/// implementations must be `Send + Sync`.
///
/// The `try_*` methods report a missing name as `Ok(None)`; an `Err` means the
/// name exists but using it failed. The declared-type methods let the
/// compiler type calls and reads ahead of time; resolvers that cannot know
/// return [`ValueType::Dynamic`], which defers checks to invocation.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use formulary::{
///     compiler::Compiler,
///     interpreter::{evaluator::core::EvalResult, value::core::Value},
///     resolver::core::Resolver,
/// };
///
/// struct Answer;
///
/// impl Resolver for Answer {
///     fn try_call(&self, _name: &str, _args: &[Value]) -> EvalResult<Option<Value>> {
///         Ok(None)
///     }
///
///     fn try_read(&self, name: &str) -> EvalResult<Option<Value>> {
///         Ok((name == "answer").then_some(Value::Integer(42)))
///     }
/// }
///
/// let compiler = Compiler::default();
/// let f = compiler.compile::<(), i64>("answer + 1", &[], Some(Arc::new(Answer))).unwrap();
/// assert_eq!(f.call(()).unwrap(), 43);
/// ```
pub trait Resolver: Send + Sync {
    /// Calls the function `name` with `args`.
    ///
    /// Returns `Ok(None)` if no such function exists.
    fn try_call(&self, name: &str, args: &[Value]) -> EvalResult<Option<Value>>;

    /// Reads the property `name`.
    ///
    /// Returns `Ok(None)` if no such property exists.
    fn try_read(&self, name: &str) -> EvalResult<Option<Value>>;

    /// Returns the declared signature of the function `name`, if known.
    fn function_signature(&self, _name: &str) -> Option<FunctionSignature> {
        None
    }

    /// Returns the declared return type of the function `name`.
    fn function_return_type(&self, name: &str) -> ValueType {
        self.function_signature(name)
            .map_or(ValueType::Dynamic, |signature| signature.returns)
    }

    /// Returns the declared type of the property `name`.
    fn property_type(&self, _name: &str) -> ValueType {
        ValueType::Dynamic
    }

    /// Calls the function `name`, failing if it does not exist.
    fn call(&self, name: &str, args: &[Value]) -> EvalResult<Value> {
        self.try_call(name, args)?
            .ok_or_else(|| RuntimeError::FunctionNotFound { name: name.to_string() })
    }

    /// Reads the property `name`, failing if it does not exist.
    fn read(&self, name: &str) -> EvalResult<Value> {
        self.try_read(name)?
            .ok_or_else(|| RuntimeError::PropertyNotFound { name: name.to_string() })
    }
}
