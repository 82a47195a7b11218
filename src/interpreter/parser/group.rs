use crate::{
    ast::Node,
    error::CompileError,
    interpreter::{
        lexer::Token,
        parser::core::{CallFrame, ParseResult, Parser, StackItem},
    },
};

impl Parser {
    /// Handles `(`.
    ///
    /// Where an operand is expected it opens a group. Right after an
    /// identifier it opens a call: the variable node just emitted is taken
    /// back and becomes the call's name.
    ///
    /// # Errors
    /// [`CompileError::UnexpectedToken`] if the `(` follows an operand that
    /// is not an identifier, as in `2(3)` or `(a)(b)`.
    pub(crate) fn open_paren(&mut self, position: usize) -> ParseResult<()> {
        let call = !self.expects_operand;

        if call {
            let name = match (&self.previous, self.output.last()) {
                (Some(Token::Identifier(_)), Some(Node::Variable(name))) => name.clone(),
                _ => {
                    return Err(CompileError::UnexpectedToken { token: "'('".to_string(),
                                                               position });
                },
            };
            self.output.pop();
            self.calls.push(CallFrame { name, arity: 0 });
        }

        self.stack.push(StackItem::Paren { call, position });
        self.expects_operand = true;
        Ok(())
    }

    /// Handles `)`.
    ///
    /// Reduces the operators of the group and discards its parenthesis. If
    /// the parenthesis opened a call, the last argument is counted and a
    /// function node is emitted.
    ///
    /// # Errors
    /// - [`CompileError::UnmatchedRightParen`] without an open `(`.
    /// - [`CompileError::EmptyArgument`] after a trailing comma, as in
    ///   `f(1,)`.
    /// - [`CompileError::UnexpectedToken`] for `()` that is not a call and
    ///   after a dangling operator, as in `(1 +)`.
    pub(crate) fn close_paren(&mut self, position: usize) -> ParseResult<()> {
        let Some(StackItem::Paren { call, .. }) = self.reduce_to_paren() else {
            return Err(CompileError::UnmatchedRightParen { position });
        };

        let empty_call = call && matches!(self.previous, Some(Token::LParen));
        if self.expects_operand && !empty_call {
            return Err(self.missing_operand(")", position));
        }

        self.stack.pop();

        if call && let Some(mut frame) = self.calls.pop() {
            if !empty_call {
                frame.arity += 1;
            }
            self.output.push(Node::Function { name:  frame.name,
                                              arity: frame.arity, });
        }

        self.expects_operand = false;
        Ok(())
    }

    /// Handles `,`.
    ///
    /// Reduces the operators of the current argument and counts it.
    ///
    /// # Errors
    /// - [`CompileError::MisplacedComma`] outside the parentheses of a call,
    ///   including inside a plain group within an argument list.
    /// - [`CompileError::EmptyArgument`] before any argument or after another
    ///   comma, as in `f(,1)` or `f(1,,2)`.
    pub(crate) fn separate_argument(&mut self, position: usize) -> ParseResult<()> {
        match self.reduce_to_paren() {
            Some(StackItem::Paren { call: true, .. }) => {},
            _ => return Err(CompileError::MisplacedComma { position }),
        }

        if self.expects_operand {
            return Err(self.missing_operand(",", position));
        }

        if let Some(frame) = self.calls.last_mut() {
            frame.arity += 1;
        }

        self.expects_operand = true;
        Ok(())
    }

    /// Builds the error for a `)` or `,` that arrives while an operand is
    /// still expected.
    fn missing_operand(&self, symbol: &str, position: usize) -> CompileError {
        match (&self.previous, self.calls.last()) {
            (Some(Token::LParen | Token::Comma), Some(frame)) if self.innermost_paren_is_call() => {
                CompileError::EmptyArgument { function: frame.name.clone(),
                                              position }
            },
            _ => CompileError::UnexpectedToken { token: format!("'{symbol}'"),
                                                 position },
        }
    }

    fn innermost_paren_is_call(&self) -> bool {
        self.stack
            .iter()
            .rev()
            .find_map(|item| match item {
                StackItem::Paren { call, .. } => Some(*call),
                StackItem::Operator(_) => None,
            })
            .unwrap_or(false)
    }
}
