use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::value::Value;

/// A handle on one scope of the scope chain. Cloning the handle shares the
/// scope; closures hold such a handle to keep their defining scope alive.
#[derive(Clone, Default)]
pub struct Env(Rc<RefCell<Scope>>);

#[derive(Default)]
struct Scope {
    store: HashMap<String, Value>,
    outer: Option<Env>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new, empty scope whose parent is `self`.
    pub fn child(&self) -> Self {
        Env(Rc::new(RefCell::new(Scope {
            store: HashMap::new(),
            outer: Some(self.clone()),
        })))
    }

    /// Walks the chain outward; the innermost binding wins.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let scope = self.0.borrow();
        match scope.store.get(name) {
            Some(value) => Some(value.clone()),
            None => scope.outer.as_ref().and_then(|outer| outer.lookup(name)),
        }
    }

    /// Always writes into this scope, shadowing any binding further out.
    pub fn bind(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().store.insert(name.into(), value);
    }

    pub fn depth(&self) -> usize {
        match &self.0.borrow().outer {
            Some(outer) => 1 + outer.depth(),
            None => 1,
        }
    }

    pub fn ptr_eq(&self, other: &Env) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Whether `scope` is this scope or one of its ancestors.
    pub fn is_within(&self, scope: &Env) -> bool {
        if self.ptr_eq(scope) {
            return true;
        }
        match &self.0.borrow().outer {
            Some(outer) => outer.is_within(scope),
            None => false,
        }
    }

    /// Drops every binding of this scope.
    pub fn clear(&self) {
        let store = std::mem::take(&mut self.0.borrow_mut().store);
        drop(store);
    }

    #[cfg(test)]
    pub(crate) fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = self.0.borrow();
        let mut names: Vec<&String> = scope.store.keys().collect();
        names.sort();
        f.debug_struct("Env")
            .field("names", &names)
            .field("depth", &self.depth())
            .finish()
    }
}
