use std::collections::HashMap;

use tracing::trace;

use crate::interpreter::value::core::Value;

/// The single mapping of names to values that every template unit executes
/// against.
///
/// Units loaded into the same [`Context`](crate::interpreter::evaluator::core::Context)
/// share it: a name bound by one unit is visible to every unit that runs
/// after it, and a later binding of the same name replaces the earlier one.
///
/// # Example
/// ```
/// use stencil::interpreter::{namespace::Namespace, value::core::Value};
///
/// let mut namespace = Namespace::default();
/// namespace.insert("a", Value::Integer(1));
/// namespace.insert("a", Value::Integer(2));
///
/// assert_eq!(namespace.get("a"), Some(&Value::Integer(2)));
/// assert!(namespace.get("b").is_none());
/// ```
#[derive(Debug, Default)]
pub struct Namespace {
    bindings: HashMap<String, Value>,
}

impl Namespace {
    /// Looks up a binding.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// Looks up a binding for in-place update.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.bindings.get_mut(name)
    }

    /// Binds `name`, replacing any previous binding.
    pub fn insert(&mut self, name: &str, value: Value) {
        if self.bindings.insert(name.to_string(), value).is_some() {
            trace!(name, "namespace binding replaced");
        }
    }

    /// Tells whether `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
