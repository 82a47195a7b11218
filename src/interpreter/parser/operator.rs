use crate::{
    ast::{Node, Operator},
    error::CompileError,
    interpreter::parser::core::{ParseResult, Parser, StackItem},
};

impl Parser {
    /// Handles an operator symbol.
    ///
    /// Where an operand is expected, `+`, `-` and `!` are prefix operators and
    /// are pushed without reducing anything, so they apply to the operand that
    /// follows. Any other symbol there is an error. An infix operator first
    /// reduces every stacked operator that binds at least as tightly.
    ///
    /// # Errors
    /// [`CompileError::UnexpectedToken`] for an infix operator where an
    /// operand is expected, as in `* 2` or `1 + / 2`.
    pub(crate) fn push_operator(&mut self, symbol: &str, position: usize) -> ParseResult<()> {
        let unexpected = || CompileError::UnexpectedToken { token: format!("operator '{symbol}'"),
                                                            position };

        if self.expects_operand {
            let op = Operator::unary(symbol).ok_or_else(unexpected)?;
            self.stack.push(StackItem::Operator(op));
            return Ok(());
        }

        let op = Operator::binary(symbol).ok_or_else(unexpected)?;
        self.reduce_while_tighter(op);
        self.stack.push(StackItem::Operator(op));
        self.expects_operand = true;
        Ok(())
    }

    /// Pops operators that bind at least as tightly as `incoming` to the
    /// output. Stops at the first open parenthesis.
    fn reduce_while_tighter(&mut self, incoming: Operator) {
        while let Some(StackItem::Operator(top)) = self.stack.last().copied() {
            if !top.descriptor().binds_tighter_than(incoming.descriptor()) {
                break;
            }
            self.stack.pop();
            self.output.push(Node::Operator(top));
        }
    }

    /// Pops every operator down to the nearest open parenthesis, leaving the
    /// parenthesis on the stack.
    ///
    /// Returns the parenthesis, or `None` if the stack has none.
    pub(crate) fn reduce_to_paren(&mut self) -> Option<StackItem> {
        while let Some(item) = self.stack.last().copied() {
            match item {
                StackItem::Operator(op) => {
                    self.stack.pop();
                    self.output.push(Node::Operator(op));
                },
                StackItem::Paren { .. } => return Some(item),
            }
        }
        None
    }
}
