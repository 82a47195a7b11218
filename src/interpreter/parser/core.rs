use crate::{
    ast::{Node, Operator, render},
    error::CompileError,
    interpreter::lexer::Token,
};

pub type ParseResult<T> = Result<T, CompileError>;

/// An entry of the operator stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackItem {
    /// An operator waiting for its right operand.
    Operator(Operator),
    /// An open parenthesis.
    Paren {
        /// `true` if the parenthesis opened a function call.
        call:     bool,
        /// Where the `(` is.
        position: usize,
    },
}

/// A function call whose closing parenthesis has not been seen yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    /// The called name, possibly a dotted path.
    pub name:  String,
    /// Arguments terminated by a comma so far.
    pub arity: usize,
}

/// Shunting-yard state.
///
/// The parser reads tokens left to right and appends postfix nodes to
/// `output`. Operators wait on `stack` until an operator that binds looser,
/// a closing parenthesis or the end of input releases them.
#[derive(Debug, Default)]
pub struct Parser {
    /// The postfix program built so far.
    pub output:          Vec<Node>,
    /// Operators and open parentheses.
    pub stack:           Vec<StackItem>,
    /// Calls whose argument lists are open, innermost last.
    pub calls:           Vec<CallFrame>,
    /// `true` while the next token must start an operand.
    pub expects_operand: bool,
    /// The token handled last.
    pub previous:        Option<Token>,
}

impl Parser {
    /// Creates a parser expecting an operand.
    #[must_use]
    pub fn new() -> Self {
        Self { expects_operand: true,
               ..Self::default() }
    }

    /// Handles one token.
    pub fn push(&mut self, token: &Token, position: usize) -> ParseResult<()> {
        match token {
            Token::Integer(_)
            | Token::Float(_)
            | Token::Bool(_)
            | Token::Str(_)
            | Token::Identifier(_) => self.push_operand(token, position)?,
            Token::Operator(symbol) => self.push_operator(symbol, position)?,
            Token::LParen => self.open_paren(position)?,
            Token::RParen => self.close_paren(position)?,
            Token::Comma => self.separate_argument(position)?,
        }

        self.previous = Some(token.clone());
        Ok(())
    }

    /// Emits a literal or variable node.
    ///
    /// # Errors
    /// [`CompileError::UnexpectedToken`] if an operand directly follows
    /// another operand, as in `1 x` or `(a)(b)`.
    fn push_operand(&mut self, token: &Token, position: usize) -> ParseResult<()> {
        if !self.expects_operand {
            return Err(CompileError::UnexpectedToken { token: token.to_string(),
                                                       position });
        }

        let node = match token {
            Token::Integer(i) => Node::Integer(*i),
            Token::Float(r) => Node::Float(*r),
            Token::Bool(b) => Node::Bool(*b),
            Token::Str(s) => Node::Str(s.clone()),
            Token::Identifier(name) => Node::Variable(name.clone()),
            _ => {
                return Err(CompileError::UnexpectedToken { token: token.to_string(),
                                                           position });
            },
        };

        self.output.push(node);
        self.expects_operand = false;
        Ok(())
    }

    /// Flushes the operator stack and returns the finished program.
    ///
    /// # Errors
    /// - [`CompileError::UnexpectedEndOfInput`] if an operand is still
    ///   expected, which includes the empty expression.
    /// - [`CompileError::UnclosedParen`] for a `(` that is never closed.
    pub fn finish(mut self) -> ParseResult<Vec<Node>> {
        if self.expects_operand {
            return Err(CompileError::UnexpectedEndOfInput);
        }

        while let Some(item) = self.stack.pop() {
            match item {
                StackItem::Operator(op) => self.output.push(Node::Operator(op)),
                StackItem::Paren { position, .. } => {
                    return Err(CompileError::UnclosedParen { position });
                },
            }
        }

        Ok(self.output)
    }
}

/// Parses a token sequence into a postfix program.
///
/// This is the entry point of the shunting-yard parser. Function calls are
/// emitted as [`Node::Function`] after their arguments, carrying the argument
/// count.
///
/// # Parameters
/// - `tokens`: `(Token, position)` pairs as produced by the lexer.
///
/// # Returns
/// The postfix program, consumed left to right by the builder.
///
/// # Example
/// ```
/// use formulary::{
///     ast::render,
///     compiler::features::Features,
///     interpreter::{lexer::tokenize, parser::core::parse},
/// };
///
/// let tokens = tokenize("-2 ^ 2 + max(a, b * 3)", Features::COMMON).unwrap();
/// let program = parse(&tokens).unwrap();
/// assert_eq!(render(&program), "2 u- 2 ^ a b 3 * max:2 +");
/// ```
pub fn parse(tokens: &[(Token, usize)]) -> ParseResult<Vec<Node>> {
    let mut parser = Parser::new();
    for (token, position) in tokens {
        parser.push(token, *position)?;
    }

    let program = parser.finish()?;
    log::debug!("postfix program: {}", render(&program));
    Ok(program)
}
