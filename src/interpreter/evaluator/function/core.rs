use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow, flow_keyword},
            function::{builtin, print, sequence, template},
        },
        value::{
            core::Value,
            function::{Callable, Function, FunctionBody},
        },
    },
};

/// Deepest nesting of running functions and units.
pub const MAX_CALL_DEPTH: usize = 100;

/// Type alias for builtin function handlers.
///
/// A builtin receives the running context, a slice of evaluated argument
/// values and the line number of the call.
pub type BuiltinFn = fn(&mut Context, &[Value], usize) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
#[derive(Debug, Clone, Copy)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Any of the listed counts.
    OneOf(&'static [usize]),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every builtin function.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

/// Metadata of one builtin function.
#[derive(Debug)]
pub struct BuiltinDef {
    /// The name the builtin is visible under.
    pub name: &'static str,
    arity:    Arity,
    func:     BuiltinFn,
}

builtin_functions! {
    "str"      => { arity: Arity::Exact(1), func: builtin::str_fn },
    "repr"     => { arity: Arity::Exact(1), func: builtin::repr },
    "int"      => { arity: Arity::Exact(1), func: builtin::int },
    "upper"    => { arity: Arity::Exact(1), func: |_, args, line| builtin::map_text("upper", args, line) },
    "lower"    => { arity: Arity::Exact(1), func: |_, args, line| builtin::map_text("lower", args, line) },
    "strip"    => { arity: Arity::Exact(1), func: |_, args, line| builtin::map_text("strip", args, line) },
    "assert"   => { arity: Arity::OneOf(&[1, 2]), func: builtin::assert_fn },
    "len"      => { arity: Arity::Exact(1), func: sequence::len },
    "join"     => { arity: Arity::Exact(2), func: sequence::join },
    "range"    => { arity: Arity::OneOf(&[1, 2]), func: sequence::range },
    "print"    => { arity: Arity::Exact(1), func: print::print },
    "load"     => { arity: Arity::Exact(1), func: template::load },
    "decorate" => { arity: Arity::Exact(1), func: template::decorate },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    const fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => {
                let mut i = 0;
                while i < arr.len() {
                    if arr[i] == n {
                        return true;
                    }
                    i += 1;
                }
                false
            },
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Exact(m) => m.to_string(),
            Self::OneOf(arr) => {
                arr.iter()
                   .map(ToString::to_string)
                   .collect::<Vec<_>>()
                   .join(" or ")
            },
        }
    }
}

/// Finds a builtin function by name.
///
/// # Example
/// ```
/// use stencil::interpreter::evaluator::function::core::lookup_builtin;
///
/// assert_eq!(lookup_builtin("len").map(|def| def.name), Some("len"));
/// assert!(lookup_builtin("sqrt").is_none());
/// ```
#[must_use]
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|def| def.name == name)
}

/// Checks that a builtin received exactly `expected` arguments.
pub fn check_arity(name: &str, args: &[Value], expected: usize, line: usize) -> EvalResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                  expected: expected.to_string(),
                                                  found: args.len(),
                                                  line })
    }
}

impl Context {
    /// Calls an arbitrary value.
    ///
    /// Only callables can be called; anything else is a `NotCallable` error.
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        match callee {
            Value::Callable(callable) => self.call(callable, args, line),
            other => Err(RuntimeError::NotCallable { type_name: other.type_name(),
                                                     line }),
        }
    }

    /// Calls a callable with already evaluated arguments.
    ///
    /// Builtins are arity-checked against the table and run directly.
    /// Plain functions run their body in a fresh local frame. Gathering
    /// functions additionally collect what their body emits.
    ///
    /// # Example
    /// ```
    /// use stencil::interpreter::{
    ///     evaluator::core::Context,
    ///     value::{core::Value, function::Callable},
    /// };
    ///
    /// let mut ctx = Context::default();
    /// let Value::Callable(len) = ctx.lookup_variable("len", 1).unwrap() else {
    ///     unreachable!()
    /// };
    ///
    /// let n = ctx.call(&len, vec![Value::from("four")], 1).unwrap();
    /// assert_eq!(n, Value::Integer(4));
    /// assert!(ctx.call(&len, vec![], 1).is_err());
    /// ```
    pub fn call(&mut self, callable: &Callable, args: Vec<Value>, line: usize) -> EvalResult<Value> {
        match callable {
            Callable::Builtin(def) => {
                if !def.arity.check(args.len()) {
                    return Err(RuntimeError::ArgumentCountMismatch { name: def.name.to_string(),
                                                                     expected: def.arity.describe(),
                                                                     found: args.len(),
                                                                     line });
                }
                self.trace.mark(line);
                self.trace.enter_builtin(def.name);
                let result = (def.func)(self, &args, line);
                self.trace.leave(result.as_ref().err().map(RuntimeError::line));
                result
            },
            Callable::Plain(function) => self.invoke_function(function, args, line),
            Callable::Gathering(function) => self.invoke_gathering(function, args, line),
        }
    }

    /// Runs a user function without any emission handling.
    ///
    /// The new local frame starts from the function's captured snapshot;
    /// arguments are bound on top of it.
    pub(crate) fn invoke_function(&mut self,
                                  function: &Rc<Function>,
                                  args: Vec<Value>,
                                  line: usize)
                                  -> EvalResult<Value> {
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: function.name.clone(),
                                                             expected: function.params
                                                                               .len()
                                                                               .to_string(),
                                                             found: args.len(),
                                                             line });
        }
        if self.trace.depth() >= MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { limit: MAX_CALL_DEPTH,
                                                      line });
        }

        let mut frame = function.captured.clone();
        frame.extend(function.params.iter().cloned().zip(args));

        self.trace.mark(line);
        self.trace.enter(&function.name, &function.file, function.line);
        self.frames.push(frame);
        self.files.push(Rc::clone(&function.file));

        let result = match &function.body {
            FunctionBody::Block(def) => match self.exec_block(&def.body) {
                Ok(Flow::Return(value)) => Ok(value),
                Ok(Flow::Next) => Ok(Value::None),
                Ok(flow) => Err(RuntimeError::UnexpectedControlFlow { keyword: flow_keyword(&flow),
                                                                      line:    def.line, }),
                Err(error) => Err(error),
            },
            FunctionBody::Expression(expr) => self.eval(expr),
        };

        self.files.pop();
        self.frames.pop();
        self.trace.leave(result.as_ref().err().map(RuntimeError::line));
        result
    }
}
