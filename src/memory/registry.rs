//! Allocation registry
//!
//! Scopes, arrays and objects are reference counted, and scripts build cycles
//! all the time: a closure stored in the scope it closes over, `o.self = o`,
//! `a.push(a)`. The interpreter records a [`Weak`] handle to everything it
//! allocates and empties all of it when the run is over, so nothing outlives
//! the run regardless of how it is linked.

use super::scope::Scope;
use super::value::{JsObject, Value};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Handles below this count are never pruned
const MIN_PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug)]
pub struct Allocations {
    scopes: Vec<Weak<Scope>>,
    arrays: Vec<Weak<RefCell<Vec<Value>>>>,
    objects: Vec<Weak<RefCell<JsObject>>>,
    prune_at: usize,
}

impl Default for Allocations {
    fn default() -> Self {
        Allocations {
            scopes: Vec::new(),
            arrays: Vec::new(),
            objects: Vec::new(),
            prune_at: MIN_PRUNE_THRESHOLD,
        }
    }
}

impl Allocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&mut self, scope: &Rc<Scope>) {
        self.scopes.push(Rc::downgrade(scope));
        self.maybe_prune();
    }

    /// Record an array or object value; primitives and functions are ignored
    pub fn value(&mut self, value: &Value) {
        match value {
            Value::Array(items) => self.arrays.push(Rc::downgrade(items)),
            Value::Object(object) => self.objects.push(Rc::downgrade(object)),
            _ => return,
        }
        self.maybe_prune();
    }

    /// Number of recorded allocations that are still alive
    pub fn live(&self) -> usize {
        self.scopes.iter().filter(|w| w.strong_count() > 0).count()
            + self.arrays.iter().filter(|w| w.strong_count() > 0).count()
            + self.objects.iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Empty every live scope, array and object
    pub fn release(&mut self) {
        for scope in self.scopes.drain(..).filter_map(|w| w.upgrade()) {
            scope.clear();
        }
        for array in self.arrays.drain(..).filter_map(|w| w.upgrade()) {
            array.borrow_mut().clear();
        }
        for object in self.objects.drain(..).filter_map(|w| w.upgrade()) {
            object.borrow_mut().clear();
        }
        self.prune_at = MIN_PRUNE_THRESHOLD;
    }

    fn len(&self) -> usize {
        self.scopes.len() + self.arrays.len() + self.objects.len()
    }

    // Long loops allocate and free scopes constantly; forget the dead handles
    fn maybe_prune(&mut self) {
        if self.len() < self.prune_at {
            return;
        }
        self.scopes.retain(|w| w.strong_count() > 0);
        self.arrays.retain(|w| w.strong_count() > 0);
        self.objects.retain(|w| w.strong_count() > 0);
        self.prune_at = (self.len() * 2).max(MIN_PRUNE_THRESHOLD);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::value::{Function, ObjectClass};
    use crate::parser::ast::Stmt;
    use crate::parser::parser::parse_source;

    #[test]
    fn test_release_breaks_self_cycles() {
        let mut allocations = Allocations::new();
        let array = Value::new_array(Vec::new());
        let object = Value::new_object(JsObject::new(ObjectClass::Plain));
        allocations.value(&array);
        allocations.value(&object);

        if let (Value::Array(items), Value::Object(props)) = (&array, &object) {
            items.borrow_mut().push(array.clone());
            props.borrow_mut().set("self", object.clone());
        }

        let weak_array = match &array {
            Value::Array(items) => Rc::downgrade(items),
            _ => unreachable!(),
        };
        drop(array);
        drop(object);
        assert_eq!(allocations.live(), 2);

        allocations.release();
        assert_eq!(allocations.live(), 0);
        assert!(weak_array.upgrade().is_none());
    }

    #[test]
    fn test_scope_closure_cycle_released() {
        let mut allocations = Allocations::new();
        let global = Scope::new_global();
        allocations.scope(&global);
        let inner = Scope::child(&global, true);
        allocations.scope(&inner);

        let program = parse_source("function me() {}").unwrap();
        let def = match &program.body[0] {
            Stmt::FunctionDecl(def) => Rc::clone(def),
            other => panic!("expected a function declaration, got {:?}", other),
        };
        // A closure stored in the scope it closes over
        let closure = Function::Closure {
            def,
            scope: Rc::clone(&inner),
        };
        inner.declare("me", Value::Function(Rc::new(closure)), true);
        let weak_inner = Rc::downgrade(&inner);
        drop(inner);
        drop(global);

        assert!(weak_inner.upgrade().is_some());
        allocations.release();
        assert_eq!(allocations.live(), 0);
        assert!(weak_inner.upgrade().is_none());
    }

    #[test]
    fn test_dead_handles_are_pruned() {
        let mut allocations = Allocations::new();
        for _ in 0..(MIN_PRUNE_THRESHOLD * 4) {
            let temporary = Value::new_array(Vec::new());
            allocations.value(&temporary);
        }
        assert!(allocations.len() <= MIN_PRUNE_THRESHOLD);
    }
}
