use thiserror::Error;

use crate::{error::ErrorKind, interpreter::value::core::ValueType};

/// Represents all errors that can occur while a compiled evaluator runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A value could not be converted to the type expected at that point.
    #[error("cannot convert {from} value to {to}: {details}")]
    ConversionFailed {
        /// The dynamic type of the value.
        from:    ValueType,
        /// The type that was required.
        to:      ValueType,
        /// Why the conversion failed.
        details: String,
    },
    /// String concatenation met a value with no textual form.
    #[error("{found} value has no string representation")]
    NotStringifiable {
        /// The type of the value.
        found: ValueType,
    },
    /// Dynamically typed operands that the operator does not accept.
    #[error("operator '{operator}' is not defined for {left} and {right}")]
    InvalidOperands {
        /// The operator symbol.
        operator: String,
        /// Type of the left operand.
        left:     ValueType,
        /// Type of the right operand.
        right:    ValueType,
    },
    /// A dynamically typed operand that a prefix operator does not accept.
    #[error("operator '{operator}' is not defined for {found}")]
    InvalidOperand {
        /// The operator symbol.
        operator: String,
        /// Type of the operand.
        found:    ValueType,
    },
    /// A dynamic call named a function the resolver does not expose.
    #[error("function '{name}' not found")]
    FunctionNotFound {
        /// The function name.
        name: String,
    },
    /// A dynamic read named a property the resolver does not expose.
    #[error("property '{name}' not found")]
    PropertyNotFound {
        /// The property name.
        name: String,
    },
    /// A call whose argument count the function cannot accept.
    #[error("function '{function}' expects {expected} arguments, found {found}")]
    ArgumentCountMismatch {
        /// The function being called.
        function: String,
        /// Human readable arity, e.g. `2` or `at least 1`.
        expected: String,
        /// Number of arguments supplied.
        found:    usize,
    },
    /// Integer or decimal division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Integer or decimal result out of range.
    #[error("arithmetic overflow in '{operator}'")]
    Overflow {
        /// The operator symbol.
        operator: String,
    },
    /// A host function reported a failure of its own.
    #[error("function '{function}' failed: {message}")]
    HostFailure {
        /// The function that failed.
        function: String,
        /// The host's message.
        message:  String,
    },
}

impl RuntimeError {
    /// Builds a [`RuntimeError::ConversionFailed`].
    pub fn conversion(from: ValueType, to: ValueType, details: impl Into<String>) -> Self {
        Self::ConversionFailed { from,
                                 to,
                                 details: details.into() }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ConversionFailed { .. }
            | Self::NotStringifiable { .. }
            | Self::InvalidOperands { .. }
            | Self::InvalidOperand { .. } => ErrorKind::Conversion,
            Self::FunctionNotFound { .. }
            | Self::PropertyNotFound { .. }
            | Self::ArgumentCountMismatch { .. } => ErrorKind::Resolution,
            Self::DivisionByZero | Self::Overflow { .. } => ErrorKind::Arithmetic,
            Self::HostFailure { .. } => ErrorKind::Host,
        }
    }
}
