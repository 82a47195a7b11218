/// The compiler facade and compiled expressions.
///
/// Runs the lexer, parser and builder over an expression and wraps the
/// resulting tree into a typed, reusable [`Compiled`] value.
pub mod core;
/// Compiler feature flags.
///
/// A small bitset type selecting which parts of the grammar and which
/// numeric regimes a compiler enables, with named presets and parsing from
/// configuration strings.
pub mod features;
/// Typed parameter lists.
///
/// Maps host tuples onto the formal inputs of a compiled expression and
/// validates the names they are declared with.
pub mod parameters;

pub use core::{Compiled, Compiler};

pub use features::Features;
pub use parameters::{Parameters, Shape};
