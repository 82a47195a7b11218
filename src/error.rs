/// Compile-time errors.
///
/// Defines every failure of a `compile` call: malformed expression text,
/// grammar violations, invalid compiler configuration and names the
/// resolver could not account for. A compile error never leaves a partially
/// built evaluator behind.
pub mod compile_error;
/// Invocation-time errors.
///
/// Contains the errors a compiled evaluator can raise while it runs: values
/// that fail their checked conversions, dynamic lookups that miss, and
/// arithmetic faults. A runtime error only aborts the invocation that raised
/// it; the evaluator stays usable.
pub mod runtime_error;

pub use compile_error::CompileError;
pub use runtime_error::RuntimeError;
use thiserror::Error;

/// The category an error belongs to.
///
/// Hosts that only care about "what went wrong" rather than the exact
/// variant can branch on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed literal, unterminated string, bad escape, feature-gated
    /// symbol or broken identifier path.
    Lexical,
    /// Mismatched parentheses, misplaced operators or operands, and operand
    /// types no operator accepts.
    Grammar,
    /// Conflicting feature flags or invalid parameter declarations.
    Configuration,
    /// Unknown identifiers and functions, missing resolver, arity mismatch.
    Resolution,
    /// A value produced during evaluation did not convert to the type
    /// expected at that point.
    Conversion,
    /// Integer or decimal overflow and division by zero.
    Arithmetic,
    /// A host function reported its own failure.
    Host,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Lexical => "lexical",
            Self::Grammar => "grammar",
            Self::Configuration => "configuration",
            Self::Resolution => "resolution",
            Self::Conversion => "conversion",
            Self::Arithmetic => "arithmetic",
            Self::Host => "host",
        };
        f.write_str(name)
    }
}

/// Either side of the compile/invoke boundary.
///
/// Useful for hosts that compile and immediately invoke and want a single
/// `?`-friendly error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The expression could not be compiled.
    #[error(transparent)]
    Compile(#[from] CompileError),
    /// The compiled evaluator failed while running.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Returns the category of the wrapped error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Compile(e) => e.kind(),
            Self::Runtime(e) => e.kind(),
        }
    }
}
