use std::fmt;

use crate::{
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueType},
    },
    resolver::{
        core::{FunctionSignature, Resolver},
        object::{ObjectResolver, Reflect, ResolverOptions},
    },
};

/// Exposes the public static members of a [`Reflect`] type.
///
/// Useful for libraries of constants and pure functions that need no
/// instance. Names are matched case-sensitively.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use formulary::{
///     compiler::Compiler,
///     interpreter::value::core::{Value, ValueType},
///     resolver::{FunctionSignature, Members, Reflect, Resolver, StaticLibrary},
/// };
///
/// struct MathLib;
///
/// impl Reflect for MathLib {
///     fn members(members: &mut Members<Self>) {
///         members.static_property("pi", || std::f64::consts::PI);
///         members.static_function("sqrt",
///                                 FunctionSignature::new([ValueType::Float], ValueType::Float),
///                                 |args: &[Value]| Ok(Value::Float(args[0].as_float()?.sqrt())));
///     }
/// }
///
/// let library: Arc<dyn Resolver> = Arc::new(StaticLibrary::<MathLib>::new());
/// let f = Compiler::default().compile::<(), f64>("sqrt(16) + pi", &[], Some(library)).unwrap();
/// assert_eq!(f.call(()).unwrap(), 4.0 + std::f64::consts::PI);
/// ```
pub struct StaticLibrary<T: Reflect> {
    inner: ObjectResolver<T>,
}

impl<T: Reflect> StaticLibrary<T> {
    /// Creates a library over the static members of `T`.
    #[must_use]
    pub fn new() -> Self {
        Self { inner: ObjectResolver::without_target(ResolverOptions::default()) }
    }
}

impl<T: Reflect> Default for StaticLibrary<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Reflect> Resolver for StaticLibrary<T> {
    fn try_call(&self, name: &str, args: &[Value]) -> EvalResult<Option<Value>> {
        self.inner.try_call(name, args)
    }

    fn try_read(&self, name: &str) -> EvalResult<Option<Value>> {
        self.inner.try_read(name)
    }

    fn function_signature(&self, name: &str) -> Option<FunctionSignature> {
        self.inner.function_signature(name)
    }

    fn property_type(&self, name: &str) -> ValueType {
        self.inner.property_type(name)
    }
}

impl<T: Reflect> fmt::Debug for StaticLibrary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticLibrary")
         .field("type", &std::any::type_name::<T>())
         .finish()
    }
}
