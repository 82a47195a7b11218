/// The builder state, literal handling and the final coercion.
///
/// Walks the postfix program once, keeping a stack of typed sub-trees, and
/// checks that exactly one tree is left at the end.
pub mod core;

/// Static typing of operators.
///
/// Chooses the regime of every operator from its operand types and rejects
/// operands that can never be valid, like `-true`.
pub mod operator;

/// Variables, member paths and function calls.
///
/// Binds names to parameters first and to the resolver otherwise, and
/// checks calls against the signatures resolvers publish.
pub mod name;
