/// Regime selection shared by the builder and the evaluator.
pub mod core;

/// `+ - * / %` in the integer, decimal and floating-point regimes.
pub mod arithmetic;

/// `^`, always evaluated in floating point.
pub mod power;

/// `== != > < >= <=` over numbers, booleans and strings.
pub mod comparison;

/// Short-circuit `&&` and `||`.
pub mod logic;

/// String concatenation with `..`.
pub mod concat;
