//! Lexical scope chain: `Context` (a name, a parent, a symbol table) plus
//! per-binding mutability.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::runtime::value::Value;

/// A single name's slot in a symbol table: its current value and whether it
/// can be reassigned.
#[derive(Clone, Debug)]
pub struct Binding {
    pub value: Value,
    pub writable: bool,
}

/// Whether an assignment to an existing chain walked into a non-writable
/// binding, or found no binding at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    Immutable,
    Undefined,
}

/// A lexical scope frame. `parent` is `None` only for the process-wide
/// global scope; every other context is created with a live parent and
/// outlives none of its ancestors (spec.md §3: "acyclic and finite").
#[derive(Debug)]
pub struct Context {
    pub name: String,
    pub parent: Option<Rc<RefCell<Context>>>,
    table: HashMap<String, Binding>,
}

impl Context {
    pub fn new(name: impl Into<String>, parent: Option<Rc<RefCell<Context>>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self { name: name.into(), parent, table: HashMap::new() }))
    }

    /// Looks up `name`, walking the parent chain outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.table.get(name) {
            Some(binding.value.clone())
        } else {
            self.parent.as_ref().and_then(|p| p.borrow().get(name))
        }
    }

    /// Creates or replaces a binding in *this* table — used for `var`/
    /// `const` declarations, function self-binding, and attribute writes.
    pub fn declare(&mut self, name: impl Into<String>, value: Value, writable: bool) {
        self.table.insert(name.into(), Binding { value, writable });
    }

    /// Writes to an existing binding found anywhere on the chain. Fails if
    /// the name is bound but non-writable, or not bound at all.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), AssignError> {
        if let Some(binding) = self.table.get_mut(name) {
            if !binding.writable {
                return Err(AssignError::Immutable);
            }
            binding.value = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(AssignError::Undefined),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_parent_chain() {
        let root = Context::new("global", None);
        root.borrow_mut().declare("x", Value::Integer(1), true);
        let child = Context::new("block", Some(root.clone()));
        assert!(matches!(child.borrow().get("x"), Some(Value::Integer(1))));
    }

    #[test]
    fn assign_to_const_fails() {
        let root = Context::new("global", None);
        root.borrow_mut().declare("x", Value::Integer(1), false);
        let err = root.borrow_mut().assign("x", Value::Integer(2)).unwrap_err();
        assert_eq!(err, AssignError::Immutable);
    }

    #[test]
    fn assign_to_undefined_fails() {
        let root = Context::new("global", None);
        let err = root.borrow_mut().assign("missing", Value::Integer(2)).unwrap_err();
        assert_eq!(err, AssignError::Undefined);
    }

    #[test]
    fn assign_writes_through_to_defining_scope() {
        let root = Context::new("global", None);
        root.borrow_mut().declare("x", Value::Integer(1), true);
        let child = Context::new("block", Some(root.clone()));
        child.borrow_mut().assign("x", Value::Integer(9)).unwrap();
        assert!(matches!(root.borrow().get("x"), Some(Value::Integer(9))));
    }
}
