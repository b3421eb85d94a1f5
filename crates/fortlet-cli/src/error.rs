//! Fatal runtime errors.
//!
//! The interpreted language has no way to catch an error: every variant
//! aborts the whole run. Evaluation returns them as values and the
//! binary turns the first one into a diagnostic and a failing exit code.

use fortlet_ast::ast::BinOp;
use fortlet_types::Type;

/// What kind of type rule was broken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Assigning a value to a slot of another type.
    Assignment {
        name: String,
        expected: Type,
        found: Type,
    },
    /// `if` or `while` condition that is not a boolean.
    Condition {
        construct: &'static str,
        found: Type,
    },
    /// Operands outside the operator's type class.
    Operands { op: BinOp, lhs: Type, rhs: Type },
    /// A write argument without textual form.
    Unprintable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// Name already visible in the scope chain, or duplicate method name.
    Redeclaration(String),
    UndeclaredVariable(String),
    UndeclaredMethod(String),
    UninitializedVariable(String),
    TypeMismatch(Mismatch),
    ArgumentCount {
        method: String,
        expected: usize,
        found: usize,
    },
    DivisionByZero(BinOp),
    MissingEntryPoint,
    /// Console input exhausted or not an integer, or the output failed.
    Io(String),
    CallDepthExceeded(u32),
}

impl EvalError {
    /// Name of the error kind as reported in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            EvalError::Redeclaration(_) => "RedeclarationError",
            EvalError::UndeclaredVariable(_) => "UndeclaredVariableError",
            EvalError::UndeclaredMethod(_) => "UndeclaredMethodError",
            EvalError::UninitializedVariable(_) => "UninitializedVariableError",
            EvalError::TypeMismatch(_) => "TypeMismatchError",
            EvalError::ArgumentCount { .. } => "ArgumentCountError",
            EvalError::DivisionByZero(_) => "DivisionByZeroError",
            EvalError::MissingEntryPoint => "MissingEntryPointError",
            EvalError::Io(_) => "IOError",
            EvalError::CallDepthExceeded(_) => "CallDepthExceededError",
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Redeclaration(name) => write!(f, "redefinition of `{}`", name),
            EvalError::UndeclaredVariable(name) => write!(f, "undeclared variable `{}`", name),
            EvalError::UndeclaredMethod(name) => write!(f, "method `{}` not found", name),
            EvalError::UninitializedVariable(name) => {
                write!(f, "using uninitialized variable `{}`", name)
            }
            EvalError::TypeMismatch(Mismatch::Assignment {
                name,
                expected,
                found,
            }) => write!(
                f,
                "can't convert {} to {} in assignment to `{}`",
                found, expected, name
            ),
            EvalError::TypeMismatch(Mismatch::Condition { construct, found }) => {
                write!(f, "expected boolean expression in {}, found {}", construct, found)
            }
            EvalError::TypeMismatch(Mismatch::Operands { op, lhs, rhs }) => write!(
                f,
                "operator `{}` cannot be applied to {} and {}",
                op.symbol(),
                lhs,
                rhs
            ),
            EvalError::TypeMismatch(Mismatch::Unprintable) => {
                write!(f, "cannot write a value of undefined type")
            }
            EvalError::ArgumentCount {
                method,
                expected,
                found,
            } => {
                let which = if found > expected { "many" } else { "few" };
                write!(
                    f,
                    "`{}`: too {} arguments (expected {}, got {})",
                    method, which, expected, found
                )
            }
            EvalError::DivisionByZero(op) => {
                write!(f, "right operand of `{}` is zero", op.symbol())
            }
            EvalError::MissingEntryPoint => write!(f, "entry method not set"),
            EvalError::Io(msg) => write!(f, "{}", msg),
            EvalError::CallDepthExceeded(limit) => {
                write!(f, "maximum call depth exceeded (limit: {} calls)", limit)
            }
        }
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult<T> = Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_name_the_identifier() {
        let e = EvalError::UninitializedVariable("count".into());
        assert_eq!(e.kind(), "UninitializedVariableError");
        assert!(e.to_string().contains("`count`"));
    }

    #[test]
    fn argument_count_says_which_way() {
        let many = EvalError::ArgumentCount {
            method: "f".into(),
            expected: 1,
            found: 2,
        };
        let few = EvalError::ArgumentCount {
            method: "f".into(),
            expected: 2,
            found: 1,
        };
        assert!(many.to_string().contains("too many"));
        assert!(few.to_string().contains("too few"));
    }

    #[test]
    fn assignment_mismatch_message() {
        let e = EvalError::TypeMismatch(Mismatch::Assignment {
            name: "flag".into(),
            expected: Type::Bool,
            found: Type::Int,
        });
        assert_eq!(e.kind(), "TypeMismatchError");
        assert_eq!(
            e.to_string(),
            "can't convert int to boolean in assignment to `flag`"
        );
    }
}
