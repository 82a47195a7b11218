//! # formulary
//!
//! formulary compiles small expressions such as `price * (1 + rate)` or
//! `player.health > 0 && name .. "!"` into typed, reusable Rust functions.
//! Which parts of the language are available is chosen per compiler with
//! [`Features`]; names that are not parameters are supplied by a host
//! [`Resolver`].
//!
//! ```
//! use formulary::compiler::Compiler;
//!
//! let compiled = Compiler::default().compile::<(i64,), i64>("-7 % x", &["x"], None)
//!                                   .unwrap();
//! assert_eq!(compiled.call((3,)).unwrap(), -1);
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the intermediate representations of an expression.
///
/// This module declares the operator table, the postfix nodes produced by
/// the parser and the typed expression tree produced by the builder and
/// walked by the evaluator.
///
/// # Responsibilities
/// - Describes every operator with its precedence, associativity and the
///   feature it requires.
/// - Defines postfix nodes and typed tree nodes.
pub mod ast;
/// The public compiler facade.
///
/// Configures features, validates parameter declarations and turns
/// expression text into typed, callable values.
///
/// # Responsibilities
/// - Runs the lexer, parser and builder in order.
/// - Maps host parameter tuples and result types onto values.
pub mod compiler;
/// Provides unified error types for compilation and evaluation.
///
/// This module defines all errors that can be raised while an expression is
/// compiled or while a compiled expression runs. Compile errors carry the
/// source position where one exists.
///
/// # Responsibilities
/// - Defines error enums for every failure mode.
/// - Groups them into kinds hosts can branch on.
pub mod error;
/// Lexing, parsing, building and evaluating expressions.
///
/// This module ties the phases of the pipeline together along with the
/// runtime value representation.
pub mod interpreter;
/// The name resolution contract and its reference implementations.
///
/// A resolver answers reads and calls for names that are not parameters.
/// The crate ships resolvers over reflected host objects, over static
/// function libraries and over ordered chains of other resolvers.
pub mod resolver;
/// General utilities for safe numeric conversion.
///
/// This module provides conversion routines that are used throughout the
/// evaluator and the host type mapping.
///
/// # Responsibilities
/// - Convert between `i64`, `f64` and `Decimal` for declared types without
///   silent data loss.
/// - Widen integer operands of floating point arithmetic.
/// - Narrow and widen host integer widths with range checks.
pub mod util;

pub use compiler::{Compiled, Compiler, Features};
pub use error::{CompileError, Error, ErrorKind, RuntimeError};
pub use interpreter::value::{
    convert::{FromValue, IntoValue},
    core::{Value, ValueType},
};
pub use resolver::Resolver;

/// Compiles a parameterless expression with [`Features::COMMON`] and no
/// resolver.
///
/// # Errors
/// Any lexical or grammar error in `expression`, and resolution errors for
/// identifiers and calls, which cannot be resolved without a resolver.
///
/// # Examples
/// ```
/// use formulary::compile;
///
/// assert_eq!(compile::<f64>("2^2^3").unwrap().call(()).unwrap(), 256.0);
/// assert_eq!(compile::<i64>("2-3-4").unwrap().call(()).unwrap(), -5);
/// assert_eq!(compile::<String>("\"a\" .. 1").unwrap().call(()).unwrap(), "a1");
///
/// assert!(compile::<f64>("x + 1").is_err());
/// ```
pub fn compile<R: FromValue>(expression: &str) -> Result<Compiled<(), R>, CompileError> {
    Compiler::default().compile(expression, &[], None)
}
