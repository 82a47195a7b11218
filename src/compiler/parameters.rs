use std::collections::HashSet;

use logos::Logos;

use crate::{
    error::CompileError,
    interpreter::{
        builder::core::Parameter,
        evaluator::core::EvalResult,
        value::{
            convert::{FromValue, IntoValue},
            core::{Value, ValueType},
        },
    },
};

/// A tuple of host values passed to a compiled expression.
///
/// Implemented for tuples of zero to seven [`IntoValue`] types. The tuple
/// order is the order of the parameter names given at compile time.
pub trait Parameters {
    /// Returns the declared type of every parameter, in order.
    fn value_types() -> Vec<ValueType>;

    /// Converts the tuple into values, in order.
    fn into_values(self) -> EvalResult<Vec<Value>>;
}

macro_rules! tuple_parameters {
    ($($name:ident : $index:tt),*) => {
        impl<$($name: IntoValue),*> Parameters for ($($name,)*) {
            fn value_types() -> Vec<ValueType> {
                vec![$($name::VALUE_TYPE),*]
            }

            fn into_values(self) -> EvalResult<Vec<Value>> {
                Ok(vec![$(self.$index.into_value()?),*])
            }
        }
    };
}

tuple_parameters!();
tuple_parameters!(A: 0);
tuple_parameters!(A: 0, B: 1);
tuple_parameters!(A: 0, B: 1, C: 2);
tuple_parameters!(A: 0, B: 1, C: 2, D: 3);
tuple_parameters!(A: 0, B: 1, C: 2, D: 3, E: 4);
tuple_parameters!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
tuple_parameters!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);

/// Describes the full signature of a compiled expression in one type.
///
/// # Example
/// ```
/// use formulary::compiler::{Compiler, Shape};
///
/// struct Area;
///
/// impl Shape for Area {
///     type Params = (f64, f64);
///     type Output = f64;
///
///     const NAMES: &'static [&'static str] = &["a", "b"];
/// }
///
/// let compiled = Compiler::default().compile_as::<Area>("a * b / 2", None)
///                                   .unwrap();
/// assert_eq!(compiled.call((3.0, 4.0)).unwrap(), 6.0);
/// ```
pub trait Shape {
    /// The parameter tuple.
    type Params: Parameters;
    /// The result type.
    type Output: FromValue;

    /// The parameter names, in tuple order.
    const NAMES: &'static [&'static str];
}

/// The one token a parameter name must consist of.
#[derive(Logos, Debug, PartialEq)]
enum ParameterName {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
}

/// Returns `true` if all of `name` lexes as a single plain identifier.
fn is_identifier(name: &str) -> bool {
    let mut lexer = ParameterName::lexer(name);
    lexer.next() == Some(Ok(ParameterName::Identifier)) && lexer.span().end == name.len()
}

/// Pairs parameter names with their declared types.
///
/// # Errors
/// - [`CompileError::ParameterCountMismatch`] if there are not exactly as
///   many names as types.
/// - [`CompileError::InvalidParameterNames`] for names that are not plain
///   identifiers.
/// - [`CompileError::DuplicateParameterNames`] for names declared twice.
///
/// # Example
/// ```
/// use formulary::{
///     compiler::parameters::declare,
///     error::CompileError,
///     interpreter::value::core::ValueType,
/// };
///
/// let types = [ValueType::Integer, ValueType::Float];
///
/// assert!(declare(&["x", "y"], &types).is_ok());
/// assert!(matches!(declare(&["x", "1y"], &types),
///                  Err(CompileError::InvalidParameterNames { .. })));
/// assert!(matches!(declare(&["x", "x"], &types),
///                  Err(CompileError::DuplicateParameterNames { .. })));
/// assert!(matches!(declare(&["x"], &types),
///                  Err(CompileError::ParameterCountMismatch { expected: 2, found: 1 })));
/// ```
pub fn declare(names: &[&str], types: &[ValueType]) -> Result<Vec<Parameter>, CompileError> {
    if names.len() != types.len() {
        return Err(CompileError::ParameterCountMismatch { expected: types.len(),
                                                          found:    names.len(), });
    }

    let invalid = names.iter()
                       .filter(|name| !is_identifier(name))
                       .copied()
                       .collect::<Vec<_>>();
    if !invalid.is_empty() {
        return Err(CompileError::InvalidParameterNames { names: invalid.join(", ") });
    }

    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for name in names {
        if !seen.insert(*name) && !duplicates.contains(name) {
            duplicates.push(*name);
        }
    }
    if !duplicates.is_empty() {
        return Err(CompileError::DuplicateParameterNames { names: duplicates.join(", ") });
    }

    Ok(names.iter()
            .zip(types)
            .map(|(name, ty)| Parameter::new(*name, *ty))
            .collect())
}
