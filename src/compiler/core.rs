use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    ast::Expr,
    compiler::{
        features::Features,
        parameters::{Parameters, Shape, declare},
    },
    error::{CompileError, RuntimeError},
    interpreter::{
        builder::core::build,
        evaluator::core::Context,
        lexer::tokenize,
        parser::core::parse,
        value::convert::FromValue,
    },
    resolver::core::Resolver,
};

/// Compiles expressions under a fixed set of [`Features`].
///
/// A compiler holds no state besides its features; compiling is a pure
/// function of the expression, the declared types and the resolver.
///
/// # Example
/// ```
/// use formulary::compiler::{Compiler, Features};
///
/// let compiler = Compiler::new(Features::COMMON).unwrap();
/// let compiled = compiler.compile::<(i64, i64), i64>("x * y + 1", &["x", "y"], None)
///                        .unwrap();
///
/// assert_eq!(compiled.call((6, 7)).unwrap(), 43);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compiler {
    features: Features,
}

impl Default for Compiler {
    fn default() -> Self {
        Self { features: Features::COMMON }
    }
}

impl Compiler {
    /// Creates a compiler.
    ///
    /// # Errors
    /// [`CompileError::ConflictingFeatures`] if both member paths and path
    /// identifiers are requested.
    ///
    /// # Example
    /// ```
    /// use formulary::compiler::{Compiler, Features};
    ///
    /// assert!(Compiler::new(Features::ALL).is_ok());
    /// assert!(Compiler::new(Features::MEMBER | Features::PATH_IDENTIFIER).is_err());
    /// ```
    pub fn new(features: Features) -> Result<Self, CompileError> {
        Ok(Self { features: features.validate()? })
    }

    /// Returns the enabled features.
    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    /// Compiles `expression` into a function of `P` returning `R`.
    ///
    /// # Parameters
    /// - `expression`: The expression text.
    /// - `names`: One name per element of `P`, in order.
    /// - `resolver`: Supplies every name that is not a parameter. It is
    ///   captured by the compiled expression and used on every call.
    ///
    /// # Returns
    /// A reusable compiled expression.
    ///
    /// # Errors
    /// Configuration errors for the parameter names are reported before the
    /// expression is looked at. Then lexical, grammar and resolution errors
    /// follow in that order.
    pub fn compile<P, R>(&self,
                         expression: &str,
                         names: &[&str],
                         resolver: Option<Arc<dyn Resolver>>)
                         -> Result<Compiled<P, R>, CompileError>
        where P: Parameters,
              R: FromValue
    {
        let parameters = declare(names, &P::value_types())?;

        let tokens = tokenize(expression, self.features)?;
        let nodes = parse(&tokens)?;

        let tree = build(&nodes, R::VALUE_TYPE, &parameters, resolver.as_ref(), self.features)?;

        Ok(Compiled { tree: Arc::new(tree),
                      resolver,
                      features: self.features,
                      signature: PhantomData })
    }

    /// Compiles `expression` with the parameters and result type described
    /// by `S`.
    ///
    /// # Errors
    /// Same as [`Compiler::compile`].
    pub fn compile_as<S: Shape>(&self,
                                expression: &str,
                                resolver: Option<Arc<dyn Resolver>>)
                                -> Result<Compiled<S::Params, S::Output>, CompileError> {
        self.compile(expression, S::NAMES, resolver)
    }
}

/// A compiled expression taking `P` and producing `R`.
///
/// Owns an immutable tree and the captured resolver, so it is cheap to
/// clone and can be called from several threads at once.
pub struct Compiled<P, R> {
    tree:      Arc<Expr>,
    resolver:  Option<Arc<dyn Resolver>>,
    features:  Features,
    signature: PhantomData<fn(P) -> R>,
}

impl<P, R> Clone for Compiled<P, R> {
    fn clone(&self) -> Self {
        Self { tree:      Arc::clone(&self.tree),
               resolver:  self.resolver.clone(),
               features:  self.features,
               signature: PhantomData, }
    }
}

impl<P, R> fmt::Debug for Compiled<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiled")
         .field("tree", &self.tree)
         .field("resolver", &self.resolver.is_some())
         .field("features", &self.features)
         .finish()
    }
}

impl<P, R> Compiled<P, R> {
    /// Returns the typed tree the expression was compiled into.
    #[must_use]
    pub fn tree(&self) -> &Expr {
        &self.tree
    }
}

impl<P: Parameters, R: FromValue> Compiled<P, R> {
    /// Evaluates the expression for one set of parameters.
    ///
    /// # Errors
    /// Conversion, resolution, arithmetic and host errors raised while the
    /// expression runs. They only affect this call.
    pub fn call(&self, params: P) -> Result<R, RuntimeError> {
        let values = params.into_values()?;
        let context = Context::new(&values, self.resolver.as_ref(), self.features);
        R::from_value(context.eval(&self.tree)?)
    }

    /// Turns the compiled expression into a plain closure.
    ///
    /// # Example
    /// ```
    /// let area = formulary::compile::<f64>("2.5 * 4").unwrap().into_fn();
    /// assert_eq!(area(()).unwrap(), 10.0);
    /// ```
    pub fn into_fn(self) -> impl Fn(P) -> Result<R, RuntimeError> + Clone + Send + Sync {
        move |params| self.call(params)
    }
}
