/// The builder turns a postfix program into a typed expression tree.
///
/// It binds names to parameters or to the resolver, picks the numeric
/// regime of every operator and inserts the conversions the declared types
/// require. Everything that can be decided before the expression runs is
/// decided here.
///
/// # Responsibilities
/// - Keeps a stack of typed sub-trees while walking the program once.
/// - Rejects operand types no operator accepts and unknown identifiers.
/// - Checks calls against the signatures resolvers publish.
pub mod builder;
/// The evaluator walks typed trees and computes results.
///
/// Every invocation of a compiled expression evaluates its tree against the
/// parameter values of that call and the resolver captured at compile time.
///
/// # Responsibilities
/// - Performs arithmetic in the integer, decimal and float regimes.
/// - Dispatches reads and calls to resolvers.
/// - Reports runtime errors such as division by zero or failed conversions.
pub mod evaluator;
/// The lexer tokenizes expression text.
///
/// Whitespace outside string literals is dropped first, then the remaining
/// text is scanned into numbers, strings, booleans, identifiers, operators
/// and delimiters. Feature flags decide which of those are allowed.
///
/// # Responsibilities
/// - Converts the input into tokens tagged with their source position.
/// - Handles numeric and string literals, identifiers, and operators.
/// - Reports lexical errors for invalid or malformed input.
pub mod lexer;
/// The parser reorders tokens into a postfix program.
///
/// A shunting-yard pass resolves precedence and associativity, tells prefix
/// operators from infix ones and counts call arguments.
///
/// # Responsibilities
/// - Converts tokens into postfix nodes.
/// - Validates the grammar, reporting errors with their position.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// Declares the values that flow through a compiled expression, their static
/// types and the checked conversions between them, as well as the mapping
/// from host types onto values.
///
/// # Responsibilities
/// - Defines the `Value` and `ValueType` enums.
/// - Implements the conversion matrix between value types.
/// - Maps host parameter and result types onto values.
pub mod value;
