//! Runtime values.

use fortlet_types::Type;

/// A tagged scalar. Equality is structural over tag and payload, so
/// values of different tags never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Value {
    /// No value: the result of a void-like call or an unassigned slot.
    #[default]
    Untyped,
    Int(i64),
    Bool(bool),
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Untyped => Type::NoType,
            Value::Int(_) => Type::Int,
            Value::Bool(_) => Type::Bool,
        }
    }

    /// Text for the write statement. `Untyped` has no textual form.
    pub fn render(&self) -> Option<String> {
        match self {
            Value::Untyped => None,
            Value::Int(v) => Some(v.to_string()),
            Value::Bool(b) => Some(b.to_string()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Untyped => write!(f, "<untyped>"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}
