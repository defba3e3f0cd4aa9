use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDef, WrapMode},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::lookup_builtin,
        },
        value::{
            core::Value,
            function::{Callable, Function, FunctionBody},
        },
    },
    util::num::resolve_index,
};

/// File name reported for code that does not come from a file.
pub const SOURCE_FILE: &str = "<string>";

impl Context {
    /// Looks up a variable by name.
    ///
    /// Variable lookup checks, in order:
    /// 1. The local frame of the running function, if any.
    /// 2. The shared namespace.
    /// 3. The builtin functions.
    ///
    /// If the variable is not found, an `UnknownVariable` error is returned.
    ///
    /// # Example
    /// ```
    /// use stencil::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut ctx = Context::default();
    /// ctx.assign("x", Value::Integer(10));
    ///
    /// assert_eq!(ctx.lookup_variable("x", 1).unwrap(), Value::Integer(10));
    /// assert!(ctx.lookup_variable("len", 1).is_ok());
    /// assert!(ctx.lookup_variable("y", 1).is_err());
    /// ```
    pub fn lookup_variable(&self, name: &str, line: usize) -> EvalResult<Value> {
        if let Some(frame) = self.frames.last()
           && let Some(value) = frame.get(name)
        {
            return Ok(value.clone());
        }
        if let Some(value) = self.namespace.get(name) {
            return Ok(value.clone());
        }
        lookup_builtin(name).map(|def| Value::Callable(Callable::Builtin(def)))
                            .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                                           line })
    }

    /// Binds a name in the innermost scope.
    ///
    /// Inside a function this is the function's local frame; at unit level it
    /// is the shared namespace.
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value);
        } else {
            self.namespace.insert(name, value);
        }
    }

    /// Replaces one element of the list bound to `name`.
    ///
    /// Lists have value semantics, so a list shared with another binding is
    /// copied before the update.
    pub(crate) fn assign_index(&mut self,
                               name: &str,
                               index: &Value,
                               value: Value,
                               line: usize)
                               -> EvalResult<()> {
        let index = index.as_integer(line)?;
        let slot = match self.frames.last_mut() {
            Some(frame) if frame.contains_key(name) => frame.get_mut(name),
            _ => self.namespace.get_mut(name),
        };
        let Some(target) = slot else {
            return Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                                       line });
        };

        match target {
            Value::List(items) => {
                let position = resolve_index(index, items.len(), line)?;
                Rc::make_mut(items)[position] = value;
                Ok(())
            },
            other => {
                Err(RuntimeError::TypeError { details: format!("cannot assign to an element of {}",
                                                               other.type_name()),
                                              line })
            },
        }
    }

    /// Evaluates `target[index]` for lists and strings.
    ///
    /// Negative indices count from the end. Strings are indexed by character.
    ///
    /// # Example
    /// ```
    /// use stencil::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let list = Value::from(vec![Value::Integer(1), Value::Integer(2)]);
    /// let last = Context::eval_index(&list, &Value::Integer(-1), 1).unwrap();
    /// assert_eq!(last, Value::Integer(2));
    ///
    /// let text = Value::from("abc");
    /// assert_eq!(Context::eval_index(&text, &Value::Integer(1), 1).unwrap(),
    ///            Value::from("b"));
    /// ```
    pub fn eval_index(target: &Value, index: &Value, line: usize) -> EvalResult<Value> {
        let index = index.as_integer(line)?;
        match target {
            Value::List(items) => Ok(items[resolve_index(index, items.len(), line)?].clone()),
            Value::Str(text) => {
                let chars = text.chars().collect::<Vec<_>>();
                let position = resolve_index(index, chars.len(), line)?;
                Ok(chars[position].to_string().into())
            },
            other => {
                Err(RuntimeError::TypeError { details: format!("{} cannot be indexed",
                                                               other.type_name()),
                                              line })
            },
        }
    }

    /// Binds a named function definition.
    ///
    /// The definition's [`WrapMode`] decides whether the function goes
    /// through the decorate hook before it is bound.
    pub(crate) fn define_function(&mut self, def: &Rc<FunctionDef>) {
        let function = Rc::new(Function { name:     def.name.clone(),
                                          params:   def.params.clone(),
                                          body:     FunctionBody::Block(Rc::clone(def)),
                                          captured: self.frames.last().cloned().unwrap_or_default(),
                                          file:     self.current_file(),
                                          line:     def.line, });
        let callable = match def.wrap {
            WrapMode::Gathering => (self.hooks.decorate)(Callable::Plain(function)),
            WrapMode::Bare | WrapMode::Reserved => Callable::Plain(function),
        };
        self.assign(&def.name, Value::Callable(callable));
    }

    /// Creates the value of a lambda expression.
    pub(crate) fn make_lambda(&self, params: &[String], body: &Rc<Expr>, line: usize) -> Value {
        let function = Function { name: "<lambda>".to_string(),
                                  params: params.to_vec(),
                                  body: FunctionBody::Expression(Rc::clone(body)),
                                  captured: self.frames.last().cloned().unwrap_or_default(),
                                  file: self.current_file(),
                                  line };
        Value::Callable(Callable::Plain(Rc::new(function)))
    }

    /// Hands an emitted value to the gather hook.
    pub(crate) fn gather(&self, value: &Value) {
        (self.hooks.gather)(&mut self.emission.borrow_mut(), value);
    }

    /// Returns the file whose code is running.
    #[must_use]
    pub fn current_file(&self) -> Rc<str> {
        self.files.last().cloned().unwrap_or_else(|| SOURCE_FILE.into())
    }
}
