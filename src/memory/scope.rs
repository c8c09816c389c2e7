//! Lexical scope chain
//!
//! A [`Scope`] is one environment record: a block, a function activation, or
//! the script's global scope. Closures hold an `Rc` to the scope they were
//! created in, so scopes outlive the call that created them when captured.
//!
//! `var` declarations land in the nearest function scope; `let` and `const`
//! land in the innermost scope.

use super::value::Value;
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A named variable slot
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}

/// Why an assignment could not be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    NotDefined,
    Constant,
}

/// Environment record with a link to its enclosing scope
#[derive(Debug)]
pub struct Scope {
    vars: RefCell<FxHashMap<String, Binding>>,
    parent: Option<Rc<Scope>>,
    is_function: bool,
}

impl Scope {
    /// Create the outermost scope
    pub fn new_global() -> Rc<Self> {
        Rc::new(Scope {
            vars: RefCell::new(FxHashMap::default()),
            parent: None,
            is_function: true,
        })
    }

    /// Create a scope nested inside `parent`
    pub fn child(parent: &Rc<Scope>, is_function: bool) -> Rc<Self> {
        Rc::new(Scope {
            vars: RefCell::new(FxHashMap::default()),
            parent: Some(Rc::clone(parent)),
            is_function,
        })
    }

    /// Declare (or redeclare) a binding in this scope
    pub fn declare(&self, name: &str, value: Value, mutable: bool) {
        self.vars
            .borrow_mut()
            .insert(name.to_string(), Binding { value, mutable });
    }

    pub fn has_own(&self, name: &str) -> bool {
        self.vars.borrow().contains_key(name)
    }

    /// The nearest enclosing function (or global) scope
    pub fn function_scope(self: &Rc<Self>) -> Rc<Scope> {
        let mut scope = Rc::clone(self);
        while !scope.is_function {
            match &scope.parent {
                Some(parent) => scope = Rc::clone(parent),
                None => break,
            }
        }
        scope
    }

    /// Resolve a name through the chain
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.vars.borrow().get(name) {
            return Some(binding.value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Assign to the nearest binding named `name`
    pub fn assign(&self, name: &str, value: Value) -> Result<(), AssignError> {
        if let Some(binding) = self.vars.borrow_mut().get_mut(name) {
            if !binding.mutable {
                return Err(AssignError::Constant);
            }
            binding.value = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(AssignError::NotDefined),
        }
    }

    /// Drop every binding, breaking closure reference cycles through this scope
    pub fn clear(&self) {
        // Take the map out first: dropping closures can drop other scopes
        let vars = std::mem::take(&mut *self.vars.borrow_mut());
        drop(vars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let global = Scope::new_global();
        global.declare("x", Value::Number(1.0), true);
        let block = Scope::child(&global, false);
        block.declare("y", Value::Number(2.0), true);

        assert_eq!(block.lookup("x").map(|v| v.to_number()), Some(1.0));
        assert_eq!(block.lookup("y").map(|v| v.to_number()), Some(2.0));
        assert!(global.lookup("y").is_none());
    }

    #[test]
    fn test_assign_respects_const_and_shadowing() {
        let global = Scope::new_global();
        global.declare("c", Value::Number(1.0), false);
        global.declare("v", Value::Number(1.0), true);
        let inner = Scope::child(&global, false);
        inner.declare("v", Value::Number(5.0), true);

        assert_eq!(inner.assign("c", Value::Null), Err(AssignError::Constant));
        assert_eq!(inner.assign("missing", Value::Null), Err(AssignError::NotDefined));
        inner.assign("v", Value::Number(9.0)).unwrap();

        assert_eq!(inner.lookup("v").map(|v| v.to_number()), Some(9.0));
        assert_eq!(global.lookup("v").map(|v| v.to_number()), Some(1.0));
    }

    #[test]
    fn test_function_scope_skips_blocks() {
        let global = Scope::new_global();
        let function = Scope::child(&global, true);
        let block = Scope::child(&function, false);

        assert!(Rc::ptr_eq(&block.function_scope(), &function));
        assert!(Rc::ptr_eq(&global.function_scope(), &global));
    }
}
