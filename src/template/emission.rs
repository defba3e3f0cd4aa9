use std::{cell::RefCell, rc::Rc};

use tracing::warn;

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    value::{
        core::Value,
        function::{Callable, Function},
    },
};

/// Stack of gathering buffers, one per running gathering call.
///
/// Only the innermost buffer receives values.
#[derive(Debug, Default)]
pub struct AccumulationStack {
    buffers: Vec<Vec<String>>,
}

impl AccumulationStack {
    /// Number of open buffers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.buffers.len()
    }

    /// Returns `true` if some buffer is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.buffers.is_empty()
    }

    /// Appends a piece of text to the innermost buffer, if any.
    pub fn append(&mut self, text: String) {
        if let Some(buffer) = self.buffers.last_mut() {
            buffer.push(text);
        }
    }

    fn push(&mut self) {
        self.buffers.push(Vec::new());
    }

    fn pop_to(&mut self, depth: usize) -> Option<Vec<String>> {
        let buffer = if self.buffers.len() > depth { self.buffers.pop() } else { None };
        self.buffers.truncate(depth);
        buffer
    }
}

/// Hands an emitted value to the innermost buffer.
///
/// Nothing happens when no buffer is open or the value is `none` or the
/// empty string; everything else is stringified and appended.
///
/// # Example
/// ```
/// use stencil::{
///     interpreter::value::core::Value,
///     template::emission::{AccumulationStack, gather},
/// };
///
/// let mut stack = AccumulationStack::default();
/// gather(&mut stack, &Value::Integer(1));
/// assert!(!stack.is_active());
/// ```
pub fn gather(stack: &mut AccumulationStack, value: &Value) {
    if !stack.is_active() {
        return;
    }
    match value {
        Value::None => {},
        Value::Str(text) if text.is_empty() => {},
        Value::Str(text) => stack.append(text.to_string()),
        other => stack.append(other.to_string()),
    }
}

/// Returns `true` for dunder names such as `__init__`.
///
/// # Example
/// ```
/// use stencil::template::emission::is_reserved_name;
///
/// assert!(is_reserved_name("__init__"));
/// assert!(!is_reserved_name("__init"));
/// assert!(!is_reserved_name("____"));
/// ```
#[must_use]
pub fn is_reserved_name(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Wraps a callable so that calling it gathers its emits.
///
/// Gathering callables are unwrapped first, so wrapping twice is the same
/// as wrapping once. Functions with reserved names come back unwrapped and
/// builtins are returned unchanged.
#[must_use]
pub fn decorate(callable: Callable) -> Callable {
    match callable {
        Callable::Plain(function) | Callable::Gathering(function) => {
            if is_reserved_name(&function.name) {
                Callable::Plain(function)
            } else {
                Callable::Gathering(function)
            }
        },
        builtin @ Callable::Builtin(_) => builtin,
    }
}

/// The emission operations the evaluator calls.
///
/// Held by the [`Context`] as plain function values, so a host can swap in
/// its own behavior without the evaluator knowing.
#[derive(Debug, Clone, Copy)]
pub struct Hooks {
    /// Called once for every executed emit statement.
    pub gather:   fn(&mut AccumulationStack, &Value),
    /// Called for every function definition the rewriter marked for
    /// gathering, and by the `decorate` builtin.
    pub decorate: fn(Callable) -> Callable,
}

impl Default for Hooks {
    fn default() -> Self {
        Self { gather, decorate }
    }
}

/// A gathered value thrown away because its function returned something
/// else explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscardedGather {
    /// The function whose buffer was discarded.
    pub function: String,
    /// The concatenated text of the buffer.
    pub text:     String,
}

impl std::fmt::Display for DiscardedGather {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,
               "template warning: discarding gathered value {:?} from function {}",
               self.text, self.function)
    }
}

/// A buffer pushed for one gathering call.
///
/// Dropping the frame without closing it, for example while an error
/// unwinds, pops the buffer and everything above it.
#[derive(Debug)]
pub struct EmissionFrame {
    stack:  Rc<RefCell<AccumulationStack>>,
    depth:  usize,
    closed: bool,
}

impl EmissionFrame {
    /// Pushes a new buffer onto the stack.
    pub fn open(stack: &Rc<RefCell<AccumulationStack>>) -> Self {
        let mut inner = stack.borrow_mut();
        let depth = inner.depth();
        inner.push();
        drop(inner);

        Self { stack: Rc::clone(stack),
               depth,
               closed: false }
    }

    /// Pops the buffer and returns its concatenated text.
    #[must_use]
    pub fn close(mut self) -> String {
        self.closed = true;
        self.stack
            .borrow_mut()
            .pop_to(self.depth)
            .map(|parts| parts.concat())
            .unwrap_or_default()
    }
}

impl Drop for EmissionFrame {
    fn drop(&mut self) {
        if !self.closed {
            self.stack.borrow_mut().pop_to(self.depth);
        }
    }
}

impl Context {
    /// Runs a gathering function.
    ///
    /// The body runs with a fresh buffer on top of the stack. If the body
    /// returns `none` the buffer's text becomes the result. Otherwise the
    /// returned value wins and a non-empty buffer is reported as a
    /// [`DiscardedGather`].
    pub(crate) fn invoke_gathering(&mut self,
                                   function: &Rc<Function>,
                                   args: Vec<Value>,
                                   line: usize)
                                   -> EvalResult<Value> {
        let frame = EmissionFrame::open(&self.emission);
        let result = self.invoke_function(function, args, line)?;
        let gathered = frame.close();

        if result.is_none() {
            return Ok(gathered.into());
        }
        if !gathered.is_empty() {
            let discarded = DiscardedGather { function: function.name.clone(),
                                              text:     gathered, };
            warn!("{discarded}");
            self.warnings.push(discarded);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        ast::{Expr, LiteralValue},
        interpreter::value::function::FunctionBody,
    };

    fn function(name: &str) -> Rc<Function> {
        let body = Expr::Literal { value: LiteralValue::None,
                                   line:  1, };
        Rc::new(Function { name:     name.to_string(),
                           params:   Vec::new(),
                           body:     FunctionBody::Expression(Rc::new(body)),
                           captured: HashMap::new(),
                           file:     "t.tmpl".into(),
                           line:     1, })
    }

    #[test]
    fn gather_skips_none_and_empty_strings() {
        let stack = Rc::new(RefCell::new(AccumulationStack::default()));
        let frame = EmissionFrame::open(&stack);

        for value in [Value::Integer(1), Value::None, Value::from(""), Value::from("x")] {
            gather(&mut stack.borrow_mut(), &value);
        }

        assert_eq!(frame.close(), "1x");
        assert!(!stack.borrow().is_active());
    }

    #[test]
    fn values_go_to_innermost_frame_only() {
        let stack = Rc::new(RefCell::new(AccumulationStack::default()));
        let outer = EmissionFrame::open(&stack);
        gather(&mut stack.borrow_mut(), &Value::from("a"));

        let inner = EmissionFrame::open(&stack);
        gather(&mut stack.borrow_mut(), &Value::from("b"));
        assert_eq!(inner.close(), "b");

        gather(&mut stack.borrow_mut(), &Value::from("c"));
        assert_eq!(outer.close(), "ac");
    }

    #[test]
    fn dropped_frame_pops_its_buffer() {
        let stack = Rc::new(RefCell::new(AccumulationStack::default()));
        let outer = EmissionFrame::open(&stack);
        {
            let _inner = EmissionFrame::open(&stack);
            let _abandoned = EmissionFrame::open(&stack);
            assert_eq!(stack.borrow().depth(), 3);
        }

        assert_eq!(stack.borrow().depth(), 1);
        drop(outer);
        assert_eq!(stack.borrow().depth(), 0);
    }

    #[test]
    fn decorate_is_idempotent() {
        let f = function("f");
        let once = decorate(Callable::Plain(Rc::clone(&f)));
        let twice = decorate(once.clone());

        assert!(matches!(&twice, Callable::Gathering(inner) if Rc::ptr_eq(inner, &f)));
        assert_eq!(once, twice);
    }

    #[test]
    fn reserved_names_are_not_wrapped() {
        assert!(matches!(decorate(Callable::Plain(function("__init__"))), Callable::Plain(_)));
    }

    #[test]
    fn discarded_gather_message_names_function() {
        let discarded = DiscardedGather { function: "f".to_string(),
                                          text:     "1".to_string(), };

        assert_eq!(discarded.to_string(),
                   "template warning: discarding gathered value \"1\" from function f");
    }
}
