use std::sync::Arc;

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::{Value, ValueType},
    },
    resolver::core::Resolver,
};

impl Context<'_> {
    /// Reads a property from the top-level resolver or from the resolver a
    /// target expression evaluates to.
    ///
    /// # Parameters
    /// - `target`: The object the property belongs to, `None` for the
    ///   top-level resolver.
    /// - `name`: The property name.
    /// - `ty`: The type declared when the tree was built; the value is
    ///   converted to it unless it is `Dynamic`.
    ///
    /// # Returns
    /// The property value.
    ///
    /// # Errors
    /// - [`RuntimeError::PropertyNotFound`] if no resolver knows the name.
    /// - A conversion error if the target is not a resolver or the value
    ///   does not fit `ty`.
    pub fn eval_read(&self, target: Option<&Expr>, name: &str, ty: ValueType) -> EvalResult<Value> {
        let value = match target {
            Some(target) => {
                let object = self.eval(target)?;
                object.as_resolver()?.read(name)?
            },
            None => {
                let resolver = self.resolver.ok_or_else(|| {
                                                 RuntimeError::PropertyNotFound { name: name.to_string() }
                                             })?;
                resolver.read(name)?
            },
        };

        log::trace!("read '{name}' -> {value:?}");
        value.convert(ty)
    }

    /// Calls a function on the top-level resolver or on the resolver a
    /// target expression evaluates to.
    ///
    /// Arguments are evaluated left to right before the call. A target is
    /// evaluated before the arguments.
    ///
    /// # Errors
    /// - [`RuntimeError::FunctionNotFound`] if no resolver knows the name.
    /// - Any error of the arguments or of the host function itself.
    /// - A conversion error if the result does not fit `ty`.
    pub fn eval_call(&self,
                     target: Option<&Expr>,
                     name: &str,
                     arguments: &[Expr],
                     ty: ValueType)
                     -> EvalResult<Value> {
        let object = target.map(|target| self.eval(target)).transpose()?;

        let resolver: &Arc<dyn Resolver> = match &object {
            Some(object) => object.as_resolver()?,
            None => self.resolver.ok_or_else(|| {
                                      RuntimeError::FunctionNotFound { name: name.to_string() }
                                  })?,
        };

        let args = arguments.iter()
                            .map(|argument| self.eval(argument))
                            .collect::<EvalResult<Vec<_>>>()?;

        log::trace!("call '{name}' with {} argument(s)", args.len());
        resolver.call(name, &args)?.convert(ty)
    }
}
