/// Core evaluation logic and the runtime context.
///
/// Contains the main evaluation routine that walks a typed tree, the context
/// holding parameter values and the resolver, and the result type shared by
/// all runtime code.
pub mod core;

/// Unary operator evaluation.
///
/// Implements prefix minus and logical not.
pub mod unary;

/// Binary operator evaluation.
///
/// Implements arithmetic in every numeric regime, exponentiation,
/// comparisons, short-circuit logic and string concatenation.
pub mod binary;

/// Resolver reads and calls.
///
/// Dispatches property reads and function calls to the top-level resolver or
/// to nested resolvers reached through member paths.
pub mod function;
