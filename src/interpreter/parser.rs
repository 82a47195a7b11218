/// Core parsing state and the entry point.
///
/// Holds the operator stack, the output program and the pending call frames,
/// and dispatches each token to the routine that handles it.
pub mod core;

/// Operator handling.
///
/// Decides between prefix and infix readings of `+`, `-` and `!`, and reduces
/// the operator stack according to precedence and associativity.
pub mod operator;

/// Parentheses, function calls and argument separators.
///
/// Tracks which parentheses open a call and counts call arguments.
pub mod group;
