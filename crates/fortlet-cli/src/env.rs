//! Scope arena.
//!
//! Every scope lives in one `Scopes` arena and names its parent by index.
//! Scopes are created and released in stack order: a block's scope is
//! released before its enclosing statement finishes, and a callee's scope
//! before the call expression returns. Lookups walk parent indices, so a
//! detached method scope never sees its caller's locals even though the
//! caller's scopes sit below it in the arena.
//!
//! Shadowing is not allowed: a name may be declared only if no scope on the
//! parent chain already declares it. As a consequence at most one scope on
//! any chain holds a given name.

use std::collections::HashMap;

use fortlet_types::Type;

use crate::error::{EvalError, EvalResult, Mismatch};
use crate::value::Value;

/// Handle to a scope in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(usize);

/// Storage of one declared variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub ty: Type,
    pub assigned: bool,
    pub value: Value,
}

#[derive(Debug)]
struct Frame {
    parent: Option<ScopeId>,
    slots: HashMap<String, Slot>,
}

#[derive(Debug)]
pub struct Scopes {
    frames: Vec<Frame>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self {
            frames: vec![Frame {
                parent: None,
                slots: HashMap::new(),
            }],
        }
    }
}

impl Scopes {
    /// Create an arena holding only the root scope
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a new empty scope under `parent`.
    pub fn push(&mut self, parent: ScopeId) -> ScopeId {
        self.open(Some(parent))
    }

    /// Open a new empty scope with no parent.
    pub fn push_detached(&mut self) -> ScopeId {
        self.open(None)
    }

    fn open(&mut self, parent: Option<ScopeId>) -> ScopeId {
        self.frames.push(Frame {
            parent,
            slots: HashMap::new(),
        });
        ScopeId(self.frames.len() - 1)
    }

    /// Release `scope` together with anything opened after it.
    /// The root scope is never released.
    pub fn pop(&mut self, scope: ScopeId) {
        debug_assert_eq!(scope.0 + 1, self.frames.len(), "scopes released out of order");
        self.frames.truncate(scope.0.max(1));
    }

    /// Find the scope on the chain from `scope` that declares `name`.
    fn resolve(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        let mut cur = Some(scope);
        while let Some(id) = cur {
            let frame = &self.frames[id.0];
            if frame.slots.contains_key(name) {
                return Some(id);
            }
            cur = frame.parent;
        }
        None
    }

    pub fn is_visible(&self, scope: ScopeId, name: &str) -> bool {
        self.resolve(scope, name).is_some()
    }

    /// Declare `name` in `scope` with no value.
    pub fn declare(&mut self, scope: ScopeId, name: &str, ty: Type) -> EvalResult<()> {
        if self.is_visible(scope, name) {
            return Err(EvalError::Redeclaration(name.to_string()));
        }
        tracing::trace!(var = name, ty = %ty, "declare");
        self.frames[scope.0].slots.insert(
            name.to_string(),
            Slot {
                ty,
                assigned: false,
                value: Value::Untyped,
            },
        );
        Ok(())
    }

    /// The slot of a visible variable.
    pub fn slot(&self, scope: ScopeId, name: &str) -> EvalResult<&Slot> {
        self.resolve(scope, name)
            .and_then(|id| self.frames[id.0].slots.get(name))
            .ok_or_else(|| EvalError::UndeclaredVariable(name.to_string()))
    }

    /// Current value of a visible variable. An unassigned slot reads as
    /// `Untyped`; callers that must reject it check `Slot::assigned`.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> EvalResult<Value> {
        self.slot(scope, name).map(|s| s.value)
    }

    /// Store `value` into the slot that declares `name`.
    pub fn assign(&mut self, scope: ScopeId, name: &str, value: Value) -> EvalResult<()> {
        let id = self
            .resolve(scope, name)
            .ok_or_else(|| EvalError::UndeclaredVariable(name.to_string()))?;
        let slot = self.frames[id.0]
            .slots
            .get_mut(name)
            .ok_or_else(|| EvalError::UndeclaredVariable(name.to_string()))?;
        if !slot.ty.is_assignable_from(value.ty()) {
            return Err(EvalError::TypeMismatch(Mismatch::Assignment {
                name: name.to_string(),
                expected: slot.ty,
                found: value.ty(),
            }));
        }
        slot.value = value;
        slot.assigned = true;
        Ok(())
    }

    /// Declare `name` with the type of `value` and assign it.
    pub fn declare_and_assign(&mut self, scope: ScopeId, name: &str, value: Value) -> EvalResult<()> {
        self.declare(scope, name, value.ty())?;
        self.assign(scope, name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_then_assign_then_lookup() {
        let mut s = Scopes::new();
        let root = s.root();
        s.declare(root, "x", Type::Int).unwrap();
        assert!(!s.slot(root, "x").unwrap().assigned);
        s.assign(root, "x", Value::Int(5)).unwrap();
        assert_eq!(s.lookup(root, "x").unwrap(), Value::Int(5));
        s.assign(root, "x", Value::Int(6)).unwrap();
        assert_eq!(s.lookup(root, "x").unwrap(), Value::Int(6));
    }

    #[test]
    fn redeclaration_in_same_scope_fails() {
        let mut s = Scopes::new();
        let root = s.root();
        s.declare(root, "x", Type::Int).unwrap();
        assert_eq!(
            s.declare(root, "x", Type::Bool),
            Err(EvalError::Redeclaration("x".into()))
        );
    }

    #[test]
    fn shadowing_an_ancestor_fails() {
        let mut s = Scopes::new();
        let root = s.root();
        s.declare(root, "x", Type::Int).unwrap();
        let inner = s.push(root);
        let deeper = s.push(inner);
        assert_eq!(
            s.declare(deeper, "x", Type::Int),
            Err(EvalError::Redeclaration("x".into()))
        );
    }

    #[test]
    fn siblings_may_reuse_a_name() {
        let mut s = Scopes::new();
        let root = s.root();
        let a = s.push(root);
        s.declare(a, "t", Type::Int).unwrap();
        s.pop(a);
        let b = s.push(root);
        s.declare(b, "t", Type::Bool).unwrap();
        s.pop(b);
        assert!(!s.is_visible(root, "t"));
    }

    #[test]
    fn lookup_and_assign_walk_to_the_declaring_scope() {
        let mut s = Scopes::new();
        let root = s.root();
        s.declare(root, "total", Type::Int).unwrap();
        let inner = s.push(root);
        s.assign(inner, "total", Value::Int(3)).unwrap();
        s.pop(inner);
        assert_eq!(s.lookup(root, "total").unwrap(), Value::Int(3));
    }

    #[test]
    fn undeclared_names() {
        let mut s = Scopes::new();
        let root = s.root();
        assert_eq!(
            s.lookup(root, "y"),
            Err(EvalError::UndeclaredVariable("y".into()))
        );
        assert_eq!(
            s.assign(root, "y", Value::Int(1)),
            Err(EvalError::UndeclaredVariable("y".into()))
        );
    }

    #[test]
    fn child_names_are_invisible_to_the_parent() {
        let mut s = Scopes::new();
        let root = s.root();
        let child = s.push(root);
        s.declare(child, "tmp", Type::Int).unwrap();
        assert!(!s.is_visible(root, "tmp"));
        s.pop(child);
        s.declare(root, "tmp", Type::Int).unwrap();
    }

    #[test]
    fn incompatible_assignment_is_a_type_error() {
        let mut s = Scopes::new();
        let root = s.root();
        s.declare(root, "flag", Type::Bool).unwrap();
        let err = s.assign(root, "flag", Value::Int(1)).unwrap_err();
        assert_eq!(err.kind(), "TypeMismatchError");
        assert!(!s.slot(root, "flag").unwrap().assigned);
    }

    #[test]
    fn declare_and_assign_uses_the_value_type() {
        let mut s = Scopes::new();
        let root = s.root();
        s.declare_and_assign(root, "p", Value::Bool(true)).unwrap();
        let slot = s.slot(root, "p").unwrap();
        assert_eq!(slot.ty, Type::Bool);
        assert!(slot.assigned);
    }

    #[test]
    fn detached_scope_sees_nothing_below_it() {
        // A callee scope opened while the caller's block and the program
        // scope both hold names.
        let mut s = Scopes::new();
        let root = s.root();
        s.declare_and_assign(root, "field", Value::Int(1)).unwrap();
        let caller = s.push(root);
        s.declare(caller, "local", Type::Int).unwrap();
        let callee = s.push_detached();
        assert!(!s.is_visible(callee, "local"));
        assert_eq!(
            s.lookup(callee, "field"),
            Err(EvalError::UndeclaredVariable("field".into()))
        );
        s.declare(callee, "local", Type::Int).unwrap();
        s.declare(callee, "field", Type::Bool).unwrap();
        s.pop(callee);
        s.pop(caller);
        assert_eq!(s.lookup(root, "field").unwrap(), Value::Int(1));
    }
}
