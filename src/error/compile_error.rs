use thiserror::Error;

use crate::{compiler::features::Features, error::ErrorKind, interpreter::value::core::ValueType};

/// Represents every error that can occur while compiling an expression.
///
/// Positions are character offsets into the expression exactly as the host
/// passed it, before whitespace was stripped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A character that starts no token.
    #[error("error at position {position}: unexpected character '{character}'")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Where it was found.
        position:  usize,
    },
    /// A numeric literal that does not follow the literal grammar or does not
    /// fit the native type it was classified as.
    #[error("error at position {position}: malformed numeric literal '{literal}'")]
    MalformedNumber {
        /// The literal text scanned so far.
        literal:  String,
        /// Where the literal starts.
        position: usize,
    },
    /// A string literal whose closing quote never arrives.
    #[error("error at position {position}: unterminated string literal")]
    UnterminatedString {
        /// Where the opening quote is.
        position: usize,
    },
    /// An escape sequence other than `\n`, `\r`, `\t`, `\\` or the literal's
    /// own quote.
    #[error("error at position {position}: invalid escape sequence '\\{sequence}'")]
    InvalidEscape {
        /// The character following the backslash.
        sequence: char,
        /// Where the backslash is.
        position: usize,
    },
    /// A construct gated behind a feature this compiler does not enable.
    #[error("error at position {position}: {construct} requires the {feature} feature")]
    FeatureDisabled {
        /// The feature that would have to be enabled.
        feature:   Features,
        /// What was attempted, e.g. `operator '&&'`.
        construct: String,
        /// Where it was attempted.
        position:  usize,
    },
    /// A dotted identifier with an empty segment (`a..b` inside a path,
    /// trailing `.`).
    #[error("error at position {position}: malformed identifier path '{path}'")]
    MalformedPath {
        /// The path text scanned so far.
        path:     String,
        /// Where the path starts.
        position: usize,
    },

    /// A token that cannot appear where it was found.
    #[error("error at position {position}: unexpected {token}")]
    UnexpectedToken {
        /// Description of the token.
        token:    String,
        /// Where the token starts.
        position: usize,
    },
    /// The expression ended while an operand was still expected.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,
    /// A `)` without a matching `(`.
    #[error("error at position {position}: ')' has no matching '('")]
    UnmatchedRightParen {
        /// Where the `)` is.
        position: usize,
    },
    /// A `(` that is never closed.
    #[error("error at position {position}: '(' is never closed")]
    UnclosedParen {
        /// Where the `(` is.
        position: usize,
    },
    /// An argument slot with no expression in it, as in `f(1,)`.
    #[error("error at position {position}: empty argument in call to '{function}'")]
    EmptyArgument {
        /// The function being called.
        function: String,
        /// Where the empty slot ends.
        position: usize,
    },
    /// A comma that does not separate call arguments.
    #[error("error at position {position}: ',' outside of a function call")]
    MisplacedComma {
        /// Where the comma is.
        position: usize,
    },
    /// The postfix program does not reduce to exactly one value.
    #[error("malformed expression: {details}")]
    MalformedProgram {
        /// What went wrong while reducing.
        details: String,
    },
    /// An operand whose static type the operator can never accept.
    #[error("operator '{operator}' cannot be applied to {found}")]
    InvalidOperand {
        /// The operator symbol.
        operator: String,
        /// The operand type.
        found:    ValueType,
    },
    /// The expression's type can never convert to the requested result type.
    #[error("expression of type {found} cannot produce a {expected} result")]
    IncompatibleResult {
        /// The static type of the expression.
        found:    ValueType,
        /// The type the host asked for.
        expected: ValueType,
    },

    /// Two mutually exclusive features were requested together.
    #[error("conflicting compiler features: {features}")]
    ConflictingFeatures {
        /// The conflicting subset.
        features: Features,
    },
    /// A feature name in a configuration string that names no feature.
    #[error("unknown compiler feature '{name}'")]
    UnknownFeature {
        /// The unrecognised name.
        name: String,
    },
    /// Parameter names that are not plain identifiers.
    #[error("invalid parameter names: {names}")]
    InvalidParameterNames {
        /// The offending names, comma separated.
        names: String,
    },
    /// Parameter names declared more than once.
    #[error("duplicated parameter names: {names}")]
    DuplicateParameterNames {
        /// The offending names, comma separated.
        names: String,
    },
    /// The number of parameter names differs from the number of parameter
    /// types.
    #[error("expected {expected} parameter names, found {found}")]
    ParameterCountMismatch {
        /// Number of parameter types.
        expected: usize,
        /// Number of names supplied.
        found:    usize,
    },

    /// A name that is neither a parameter nor resolvable, with no resolver
    /// to defer to.
    #[error("unknown identifier '{name}'")]
    UnknownIdentifier {
        /// The identifier.
        name: String,
    },
    /// A function call compiled without any resolver.
    #[error("call to '{function}' requires a resolver")]
    MissingResolver {
        /// The function being called.
        function: String,
    },
    /// A call whose argument count the resolved function cannot accept.
    #[error("function '{function}' expects {expected} arguments, found {found}")]
    ArgumentCountMismatch {
        /// The function being called.
        function: String,
        /// Human readable arity, e.g. `2` or `at least 1`.
        expected: String,
        /// Number of arguments supplied.
        found:    usize,
    },
}

impl CompileError {
    /// Returns the category of this error.
    ///
    /// # Example
    /// ```
    /// use formulary::error::{CompileError, ErrorKind};
    ///
    /// let err = CompileError::UnterminatedString { position: 0 };
    /// assert_eq!(err.kind(), ErrorKind::Lexical);
    /// ```
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnexpectedCharacter { .. }
            | Self::MalformedNumber { .. }
            | Self::UnterminatedString { .. }
            | Self::InvalidEscape { .. }
            | Self::FeatureDisabled { .. }
            | Self::MalformedPath { .. } => ErrorKind::Lexical,
            Self::UnexpectedToken { .. }
            | Self::UnexpectedEndOfInput
            | Self::UnmatchedRightParen { .. }
            | Self::UnclosedParen { .. }
            | Self::EmptyArgument { .. }
            | Self::MisplacedComma { .. }
            | Self::MalformedProgram { .. }
            | Self::InvalidOperand { .. }
            | Self::IncompatibleResult { .. } => ErrorKind::Grammar,
            Self::ConflictingFeatures { .. }
            | Self::UnknownFeature { .. }
            | Self::InvalidParameterNames { .. }
            | Self::DuplicateParameterNames { .. }
            | Self::ParameterCountMismatch { .. } => ErrorKind::Configuration,
            Self::UnknownIdentifier { .. }
            | Self::MissingResolver { .. }
            | Self::ArgumentCountMismatch { .. } => ErrorKind::Resolution,
        }
    }
}
