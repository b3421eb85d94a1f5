//! Operand typing rules for binary operators.

use fortlet_ast::ast::BinOp;

use crate::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// `+ - * / %`: Int x Int -> Int
    Arithmetic,
    /// `and or`: Bool x Bool -> Bool
    Logical,
    /// `== !=`: T x T -> Bool for any single T
    Equality,
    /// `< > <= >=`: Int x Int -> Bool
    Relational,
}

impl OpClass {
    pub fn of(op: BinOp) -> Self {
        match op {
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => OpClass::Arithmetic,
            BinOp::And | BinOp::Or => OpClass::Logical,
            BinOp::Eq | BinOp::Ne => OpClass::Equality,
            BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => OpClass::Relational,
        }
    }

    /// Check both operand types against this class.
    pub fn accepts(self, lhs: Type, rhs: Type) -> bool {
        match self {
            OpClass::Arithmetic | OpClass::Relational => lhs == Type::Int && rhs == Type::Int,
            OpClass::Logical => lhs == Type::Bool && rhs == Type::Bool,
            OpClass::Equality => lhs == rhs,
        }
    }
}
