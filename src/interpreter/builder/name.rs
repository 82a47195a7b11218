use crate::{
    ast::Expr,
    compiler::features::Features,
    error::CompileError,
    interpreter::{
        builder::core::{BuildResult, Builder, coerce},
        value::core::ValueType,
    },
};

impl Builder<'_> {
    /// Binds a variable node.
    ///
    /// A parameter of the same name always wins. With the Member feature a
    /// dotted name reads its last segment from the object the leading
    /// segments lead to; with the path-identifier feature, or without a dot,
    /// the whole name is read from the resolver.
    ///
    /// # Errors
    /// [`CompileError::UnknownIdentifier`] if the name is not a parameter and
    /// there is no resolver to ask.
    pub(crate) fn build_variable(&self, name: &str) -> BuildResult<Expr> {
        if let Some(parameter) = self.parameter(name) {
            return Ok(parameter);
        }

        match self.split_member(name) {
            Some((path, member)) => {
                let target = self.build_path(path, name)?;
                Ok(Expr::Read { target: Some(Box::new(target)),
                                name:   member.to_string(),
                                ty:     ValueType::Dynamic, })
            },
            None => self.build_root(name, name),
        }
    }

    /// Binds a function node, taking its arguments off the stack.
    ///
    /// Top-level calls are checked against the signature the resolver
    /// publishes and typed with its declared return type. Calls on member
    /// paths are dispatched to whatever the path evaluates to and return
    /// `Dynamic`.
    ///
    /// # Errors
    /// - [`CompileError::MissingResolver`] if there is no resolver to call.
    /// - [`CompileError::ArgumentCountMismatch`] if the signature does not
    ///   accept `arity` arguments.
    /// - [`CompileError::IncompatibleResult`] if an argument can never
    ///   convert to its declared parameter type.
    pub(crate) fn build_call(&mut self, name: &str, arity: usize) -> BuildResult<Expr> {
        let arguments = self.pop_many(arity)?;

        if let Some((path, member)) = self.split_member(name) {
            let root = path.split('.').next().unwrap_or(path);
            if self.resolver.is_none() && self.parameter(root).is_none() {
                return Err(CompileError::MissingResolver { function: name.to_string() });
            }

            let target = self.build_path(path, name)?;
            return Ok(Expr::Call { target: Some(Box::new(target)),
                                   name: member.to_string(),
                                   arguments,
                                   ty: ValueType::Dynamic });
        }

        let resolver =
            self.resolver
                .ok_or_else(|| CompileError::MissingResolver { function: name.to_string() })?;

        let arguments = match resolver.function_signature(name) {
            Some(signature) => {
                if !signature.accepts(arguments.len()) {
                    return Err(CompileError::ArgumentCountMismatch { function: name.to_string(),
                                                                     expected: signature.arity(),
                                                                     found:    arguments.len(), });
                }

                arguments.into_iter()
                         .enumerate()
                         .map(|(i, argument)| coerce(argument, signature.parameter_type(i)))
                         .collect::<BuildResult<Vec<_>>>()?
            },
            None => arguments,
        };

        Ok(Expr::Call { target: None,
                        name: name.to_string(),
                        arguments,
                        ty: resolver.function_return_type(name) })
    }

    fn parameter(&self, name: &str) -> Option<Expr> {
        self.parameters
            .iter()
            .enumerate()
            .find(|(_, parameter)| parameter.name == name)
            .map(|(index, parameter)| Expr::Parameter { index,
                                                        ty: parameter.ty })
    }

    /// Splits `a.b.c` into `("a.b", "c")` when member paths are enabled.
    fn split_member<'n>(&self, name: &'n str) -> Option<(&'n str, &'n str)> {
        if self.features.contains(Features::MEMBER) {
            name.rsplit_once('.')
        } else {
            None
        }
    }

    /// Binds a name that is not a member of anything: a parameter or a
    /// property of the top-level resolver.
    fn build_root(&self, segment: &str, full: &str) -> BuildResult<Expr> {
        if let Some(parameter) = self.parameter(segment) {
            return Ok(parameter);
        }

        let resolver = self.resolver
                           .ok_or_else(|| CompileError::UnknownIdentifier { name: full.to_string() })?;

        Ok(Expr::Read { target: None,
                        name:   segment.to_string(),
                        ty:     resolver.property_type(segment), })
    }

    /// Builds the object a dotted path leads to.
    fn build_path(&self, path: &str, full: &str) -> BuildResult<Expr> {
        let mut segments = path.split('.');
        let root = segments.next().unwrap_or(path);
        let mut target = self.build_root(root, full)?;

        for segment in segments {
            target = Expr::Read { target: Some(Box::new(Self::member_target(target)?)),
                                  name:   segment.to_string(),
                                  ty:     ValueType::Dynamic, };
        }

        Self::member_target(target)
    }

    /// Checks that `target` can have members.
    fn member_target(target: Expr) -> BuildResult<Expr> {
        match target.value_type() {
            ValueType::Resolver | ValueType::Dynamic => Ok(target),
            found => Err(CompileError::InvalidOperand { operator: ".".to_string(),
                                                        found }),
        }
    }
}
