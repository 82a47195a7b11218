use crate::{
    ast::{Expr, Operator, Regime},
    error::CompileError,
    interpreter::{
        builder::core::{BuildResult, Builder},
        evaluator::binary::core::{comparison_regime, numeric_regime},
        value::core::ValueType,
    },
};

fn invalid_operand(op: Operator, found: ValueType) -> CompileError {
    CompileError::InvalidOperand { operator: op.symbol().to_string(),
                                   found }
}

/// Returns the first operand type that is neither numeric nor `Dynamic`.
fn non_numeric(left: ValueType, right: ValueType) -> Option<ValueType> {
    [left, right].into_iter()
                 .find(|ty| !ty.is_numeric() && *ty != ValueType::Dynamic)
}

impl Builder<'_> {
    /// Pops the operands of `op` and builds the typed operator node.
    pub(crate) fn build_operator(&mut self, op: Operator) -> BuildResult<Expr> {
        if op.is_unary() {
            let operand = self.pop()?;
            return self.build_unary(op, operand);
        }

        let right = self.pop()?;
        let left = self.pop()?;
        self.build_binary(op, left, right)
    }

    fn build_unary(&self, op: Operator, operand: Expr) -> BuildResult<Expr> {
        use Operator::{Not, UnaryMinus, UnaryPlus};

        let ty = operand.value_type();

        match op {
            UnaryPlus | UnaryMinus => {
                let regime = match ty {
                    ValueType::Dynamic => Regime::Dynamic,
                    _ => numeric_regime(self.features, ty, ty).ok_or_else(|| {
                                                                  invalid_operand(op, ty)
                                                              })?,
                };

                if op == UnaryPlus {
                    return Ok(operand);
                }

                Ok(Expr::Negate { operand: Box::new(operand),
                                  regime })
            },
            Not => match ty {
                ValueType::Bool | ValueType::Dynamic => Ok(Expr::Not(Box::new(operand))),
                _ => Err(invalid_operand(op, ty)),
            },
            _ => unreachable!("not a unary operator"),
        }
    }

    fn build_binary(&self, op: Operator, left: Expr, right: Expr) -> BuildResult<Expr> {
        use Operator::{
            Add, And, Concat, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
            NotEqual, Or, Pow, Sub,
        };

        let (lt, rt) = (left.value_type(), right.value_type());
        let (left, right) = (Box::new(left), Box::new(right));

        match op {
            Add | Sub | Mul | Div | Mod => {
                if let Some(found) = non_numeric(lt, rt) {
                    return Err(invalid_operand(op, found));
                }
                let regime = numeric_regime(self.features, lt, rt).unwrap_or(Regime::Dynamic);
                Ok(Expr::Arithmetic { op,
                                      regime,
                                      left,
                                      right })
            },
            Pow => match non_numeric(lt, rt) {
                Some(found) => Err(invalid_operand(op, found)),
                None => Ok(Expr::Power { left, right }),
            },
            Equal | NotEqual | Greater | Less | GreaterEqual | LessEqual => {
                let regime = comparison_regime(self.features, lt, rt).ok_or_else(|| {
                                 let found = if matches!(lt, ValueType::Array | ValueType::Resolver) {
                                     lt
                                 } else {
                                     rt
                                 };
                                 invalid_operand(op, found)
                             })?;

                if regime == Regime::Bool && !matches!(op, Equal | NotEqual) {
                    return Err(invalid_operand(op, ValueType::Bool));
                }

                Ok(Expr::Comparison { op,
                                      regime,
                                      left,
                                      right })
            },
            And | Or => {
                match [lt, rt].into_iter()
                              .find(|ty| !matches!(ty, ValueType::Bool | ValueType::Dynamic))
                {
                    Some(found) => Err(invalid_operand(op, found)),
                    None => Ok(Expr::Logical { op, left, right }),
                }
            },
            Concat => {
                match [lt, rt].into_iter()
                              .find(|ty| matches!(ty, ValueType::Array | ValueType::Resolver))
                {
                    Some(found) => Err(invalid_operand(op, found)),
                    None => Ok(Expr::Concat { left, right }),
                }
            },
            _ => unreachable!("not a binary operator"),
        }
    }
}
