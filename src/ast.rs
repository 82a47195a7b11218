use std::fmt;

use crate::{
    compiler::features::Features,
    interpreter::value::core::{Value, ValueType},
};

/// Precedence and associativity of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorDescriptor {
    /// Higher binds tighter.
    pub precedence:        u8,
    /// `true` for operators that group right to left.
    pub right_associative: bool,
}

impl OperatorDescriptor {
    /// Returns `true` if an operator with this descriptor already on the
    /// stack must be reduced before `incoming` is pushed.
    ///
    /// That is the case when this operator's precedence is strictly greater,
    /// or equal and `incoming` groups left to right.
    ///
    /// # Example
    /// ```
    /// use formulary::ast::Operator;
    ///
    /// let add = Operator::Add.descriptor();
    /// let pow = Operator::Pow.descriptor();
    ///
    /// assert!(add.binds_tighter_than(add));
    /// assert!(!pow.binds_tighter_than(pow));
    /// assert!(pow.binds_tighter_than(add));
    /// ```
    #[must_use]
    pub const fn binds_tighter_than(self, incoming: Self) -> bool {
        self.precedence > incoming.precedence
        || (self.precedence == incoming.precedence && !incoming.right_associative)
    }
}

/// Defines the operator set by generating the [`Operator`] enum, its
/// per-variant metadata and a list of all variants for symbol lookup.
///
/// Each entry provides:
/// - the variant name,
/// - the source symbol,
/// - the precedence and associativity,
/// - whether it is a prefix operator,
/// - the feature that must be enabled to use it.
macro_rules! operator_table {
    (
        $(
            $(#[$meta:meta])*
            $variant:ident => {
                symbol: $symbol:literal,
                precedence: $precedence:literal,
                right: $right:literal,
                unary: $unary:literal,
                requires: $requires:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Represents an operator of the expression language.
        ///
        /// Prefix `+`, `-` and `!` are distinct from their infix counterparts
        /// and bind tighter than any binary operator.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operator {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        static OPERATORS: &[Operator] = &[
            $(Operator::$variant,)*
        ];

        impl Operator {
            /// Returns the source symbol.
            #[must_use]
            pub const fn symbol(self) -> &'static str {
                match self {
                    $(Self::$variant => $symbol,)*
                }
            }

            /// Returns precedence and associativity.
            #[must_use]
            pub const fn descriptor(self) -> OperatorDescriptor {
                match self {
                    $(
                        Self::$variant => OperatorDescriptor { precedence:        $precedence,
                                                               right_associative: $right },
                    )*
                }
            }

            /// Returns `true` for prefix operators.
            #[must_use]
            pub const fn is_unary(self) -> bool {
                match self {
                    $(Self::$variant => $unary,)*
                }
            }

            /// Returns the feature this operator is gated behind.
            #[must_use]
            pub const fn requires(self) -> Features {
                match self {
                    $(Self::$variant => $requires,)*
                }
            }
        }
    };
}

operator_table! {
    /// Logical or (`||`), short-circuiting.
    Or => { symbol: "||", precedence: 1, right: false, unary: false, requires: Features::BOOLEAN },
    /// Logical and (`&&`), short-circuiting.
    And => { symbol: "&&", precedence: 2, right: false, unary: false, requires: Features::BOOLEAN },
    /// Equal to (`==`).
    Equal => { symbol: "==", precedence: 3, right: false, unary: false, requires: Features::BOOLEAN },
    /// Not equal to (`!=`).
    NotEqual => { symbol: "!=", precedence: 3, right: false, unary: false, requires: Features::BOOLEAN },
    /// Greater than (`>`).
    Greater => { symbol: ">", precedence: 4, right: false, unary: false, requires: Features::BOOLEAN },
    /// Less than (`<`).
    Less => { symbol: "<", precedence: 4, right: false, unary: false, requires: Features::BOOLEAN },
    /// Greater than or equal (`>=`).
    GreaterEqual => { symbol: ">=", precedence: 4, right: false, unary: false, requires: Features::BOOLEAN },
    /// Less than or equal (`<=`).
    LessEqual => { symbol: "<=", precedence: 4, right: false, unary: false, requires: Features::BOOLEAN },
    /// Addition (`+`).
    Add => { symbol: "+", precedence: 5, right: false, unary: false, requires: Features::MINIMAL },
    /// Subtraction (`-`).
    Sub => { symbol: "-", precedence: 5, right: false, unary: false, requires: Features::MINIMAL },
    /// String concatenation (`..`).
    Concat => { symbol: "..", precedence: 5, right: false, unary: false, requires: Features::STRING },
    /// Multiplication (`*`).
    Mul => { symbol: "*", precedence: 6, right: false, unary: false, requires: Features::MINIMAL },
    /// Division (`/`).
    Div => { symbol: "/", precedence: 6, right: false, unary: false, requires: Features::MINIMAL },
    /// Remainder (`%`).
    Mod => { symbol: "%", precedence: 6, right: false, unary: false, requires: Features::MINIMAL },
    /// Exponentiation (`^`), always floating point.
    Pow => { symbol: "^", precedence: 7, right: true, unary: false, requires: Features::MINIMAL },
    /// Prefix plus (`+x`).
    UnaryPlus => { symbol: "+", precedence: 8, right: true, unary: true, requires: Features::MINIMAL },
    /// Prefix minus (`-x`).
    UnaryMinus => { symbol: "-", precedence: 8, right: true, unary: true, requires: Features::MINIMAL },
    /// Logical not (`!x`).
    Not => { symbol: "!", precedence: 8, right: true, unary: true, requires: Features::BOOLEAN },
}

impl Operator {
    /// Looks up the infix operator spelled `symbol`.
    #[must_use]
    pub fn binary(symbol: &str) -> Option<Self> {
        OPERATORS.iter()
                 .copied()
                 .find(|op| !op.is_unary() && op.symbol() == symbol)
    }

    /// Looks up the prefix operator spelled `symbol`.
    ///
    /// # Example
    /// ```
    /// use formulary::ast::Operator;
    ///
    /// assert_eq!(Operator::unary("-"), Some(Operator::UnaryMinus));
    /// assert_eq!(Operator::unary("*"), None);
    /// ```
    #[must_use]
    pub fn unary(symbol: &str) -> Option<Self> {
        OPERATORS.iter()
                 .copied()
                 .find(|op| op.is_unary() && op.symbol() == symbol)
    }

    /// Returns the operator spelled `symbol`, preferring the infix form.
    ///
    /// Both forms of a symbol share the same feature gate.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::binary(symbol).or_else(|| Self::unary(symbol))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unary() {
            write!(f, "u{}", self.symbol())
        } else {
            write!(f, "{}", self.symbol())
        }
    }
}

/// A single step of the postfix program produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An integer literal.
    Integer(i64),
    /// A floating-point literal.
    Float(f64),
    /// A boolean literal.
    Bool(bool),
    /// A string literal, escapes already processed.
    Str(String),
    /// An operator applied to the operands on top of the stack.
    Operator(Operator),
    /// A call consuming `arity` operands.
    Function {
        /// The function name, possibly a dotted path.
        name:  String,
        /// Number of arguments.
        arity: usize,
    },
    /// A name to resolve, possibly a dotted path.
    Variable(String),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(r) => write!(f, "{r:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Operator(op) => write!(f, "{op}"),
            Self::Function { name, arity } => write!(f, "{name}:{arity}"),
            Self::Variable(name) => write!(f, "{name}"),
        }
    }
}

/// Renders a postfix program as space separated nodes.
///
/// # Example
/// ```
/// use formulary::ast::{Node, Operator, render};
///
/// let program = [Node::Integer(1), Node::Integer(2), Node::Operator(Operator::Add)];
/// assert_eq!(render(&program), "1 2 +");
/// ```
#[must_use]
pub fn render(nodes: &[Node]) -> String {
    nodes.iter()
         .map(ToString::to_string)
         .collect::<Vec<_>>()
         .join(" ")
}

/// The operand domain an operator works in, chosen when the tree is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Checked 64-bit integer arithmetic.
    Integer,
    /// Checked fixed-point decimal arithmetic.
    Decimal,
    /// IEEE-754 double precision.
    Float,
    /// Boolean equality.
    Bool,
    /// Lexicographic string comparison.
    String,
    /// Decided per invocation from the runtime operand types.
    Dynamic,
}

impl Regime {
    /// Returns the static type of an arithmetic result in this regime.
    #[must_use]
    pub const fn value_type(self) -> ValueType {
        match self {
            Self::Integer => ValueType::Integer,
            Self::Decimal => ValueType::Decimal,
            Self::Float => ValueType::Float,
            Self::Bool => ValueType::Bool,
            Self::String => ValueType::String,
            Self::Dynamic => ValueType::Dynamic,
        }
    }
}

/// A typed evaluator tree built from a postfix program.
///
/// Every node knows its static [`ValueType`]; operators carry the regime
/// selected for their operands.
#[derive(Debug, Clone)]
pub enum Expr {
    /// A literal value.
    Constant(Value),
    /// A positional parameter of the compiled evaluator.
    Parameter {
        /// Position in the parameter tuple.
        index: usize,
        /// Declared host type.
        ty:    ValueType,
    },
    /// Prefix minus.
    Negate {
        /// The operand.
        operand: Box<Self>,
        /// The arithmetic regime.
        regime:  Regime,
    },
    /// Logical not.
    Not(Box<Self>),
    /// `+ - * / %`.
    Arithmetic {
        /// The operator.
        op:     Operator,
        /// The arithmetic regime.
        regime: Regime,
        /// Left operand.
        left:   Box<Self>,
        /// Right operand.
        right:  Box<Self>,
    },
    /// `^`, evaluated in floating point.
    Power {
        /// The base.
        left:  Box<Self>,
        /// The exponent.
        right: Box<Self>,
    },
    /// `== != > < >= <=`.
    Comparison {
        /// The operator.
        op:     Operator,
        /// The operand domain.
        regime: Regime,
        /// Left operand.
        left:   Box<Self>,
        /// Right operand.
        right:  Box<Self>,
    },
    /// `&&` or `||`; the right side is evaluated only when needed.
    Logical {
        /// [`Operator::And`] or [`Operator::Or`].
        op:    Operator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// `..`.
    Concat {
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
    },
    /// A property read.
    Read {
        /// The nested resolver to read from, or the top-level resolver.
        target: Option<Box<Self>>,
        /// The property name.
        name:   String,
        /// Declared property type.
        ty:     ValueType,
    },
    /// A function call.
    Call {
        /// The nested resolver to call into, or the top-level resolver.
        target:    Option<Box<Self>>,
        /// The function name.
        name:      String,
        /// Arguments in source order.
        arguments: Vec<Self>,
        /// Declared return type.
        ty:        ValueType,
    },
    /// A conversion checked at invocation.
    Convert {
        /// The converted expression.
        expr: Box<Self>,
        /// The target type.
        to:   ValueType,
    },
}

impl Expr {
    /// Returns the static type of the value this node produces.
    ///
    /// ## Example
    /// ```
    /// use formulary::{
    ///     ast::Expr,
    ///     interpreter::value::core::{Value, ValueType},
    /// };
    ///
    /// let power = Expr::Power { left:  Box::new(Expr::Constant(Value::Integer(2))),
    ///                           right: Box::new(Expr::Constant(Value::Integer(3))), };
    /// assert_eq!(power.value_type(), ValueType::Float);
    /// ```
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Constant(value) => value.value_type(),
            Self::Parameter { ty, .. } | Self::Read { ty, .. } | Self::Call { ty, .. } => *ty,
            Self::Negate { regime, .. } | Self::Arithmetic { regime, .. } => regime.value_type(),
            Self::Power { .. } => ValueType::Float,
            Self::Not(_) | Self::Comparison { .. } | Self::Logical { .. } => ValueType::Bool,
            Self::Concat { .. } => ValueType::String,
            Self::Convert { to, .. } => *to,
        }
    }
}
