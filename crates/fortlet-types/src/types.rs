//! Core `Type` definitions for fortlet.

use std::fmt;

use fortlet_ast::ast::TypeName;

/// The three scalar types. `NoType` marks "undefined": void-like
/// methods, unknown type names, and values that were never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    #[default]
    NoType,
    Int,
    Bool,
}

impl Type {
    /// Resolve a source type name. Unknown names resolve to `NoType`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "int" => Type::Int,
            "boolean" => Type::Bool,
            _ => Type::NoType,
        }
    }

    /// Resolve an optional return type; a missing one is `NoType`.
    pub fn from_type_name(name: Option<&TypeName>) -> Self {
        name.map_or(Type::NoType, |n| Type::from_name(n.as_str()))
    }

    /// Whether a slot declared with `self` may hold a value of type `other`.
    /// There are no implicit conversions.
    pub fn is_assignable_from(self, other: Type) -> bool {
        self == other
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::NoType => "undefined type",
            Type::Int => "int",
            Type::Bool => "boolean",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_source_names() {
        assert_eq!(Type::from_name("int"), Type::Int);
        assert_eq!(Type::from_name("boolean"), Type::Bool);
        assert_eq!(Type::from_name("string"), Type::NoType);
        assert_eq!(Type::from_type_name(None), Type::NoType);
        assert_eq!(
            Type::from_type_name(Some(&TypeName::new("boolean"))),
            Type::Bool
        );
    }

    #[test]
    fn assignability_is_exact() {
        assert!(Type::Int.is_assignable_from(Type::Int));
        assert!(!Type::Int.is_assignable_from(Type::Bool));
        assert!(!Type::Bool.is_assignable_from(Type::NoType));
        assert!(Type::NoType.is_assignable_from(Type::NoType));
    }

    #[test]
    fn display_uses_source_spelling() {
        assert_eq!(Type::Bool.to_string(), "boolean");
        assert_eq!(Type::NoType.to_string(), "undefined type");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_variant_name() {
        assert_eq!(serde_json::to_string(&Type::Int).unwrap(), "\"Int\"");
    }
}
