use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{Expr, FunctionDef},
    interpreter::{evaluator::function::core::BuiltinDef, value::core::Value},
};

/// The code a user function runs.
#[derive(Debug)]
pub enum FunctionBody {
    /// A `fn name(...) { ... }` definition.
    Block(Rc<FunctionDef>),
    /// The expression of a lambda.
    Expression(Rc<Expr>),
}

/// A user-defined function or lambda, closed over its defining scope.
#[derive(Debug)]
pub struct Function {
    /// The bound name; lambdas are called `<lambda>`.
    pub name:     String,
    /// Parameter names.
    pub params:   Vec<String>,
    /// The body.
    pub body:     FunctionBody,
    /// Snapshot of the local frame the function was defined in. Empty for
    /// functions defined at unit level, which see the shared namespace
    /// instead.
    pub captured: HashMap<String, Value>,
    /// The template file the function was defined in.
    pub file:     Rc<str>,
    /// The line of the definition.
    pub line:     usize,
}

/// A value that can be called.
///
/// `Gathering` marks a function wrapped by the emission runtime: calling it
/// collects everything its body emits. The wrapped original stays reachable,
/// which keeps wrapping idempotent.
#[derive(Debug, Clone)]
pub enum Callable {
    /// An unwrapped user function or lambda.
    Plain(Rc<Function>),
    /// A user function whose emits are gathered into its result.
    Gathering(Rc<Function>),
    /// A function implemented by the interpreter.
    Builtin(&'static BuiltinDef),
}

impl Callable {
    /// Returns the name the callable was defined with.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(function) | Self::Gathering(function) => &function.name,
            Self::Builtin(def) => def.name,
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Plain(a), Self::Plain(b)) | (Self::Gathering(a), Self::Gathering(b)) => {
                Rc::ptr_eq(a, b)
            },
            (Self::Builtin(a), Self::Builtin(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl std::fmt::Display for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(function) | Self::Gathering(function) => {
                write!(f, "<function {}>", function.name)
            },
            Self::Builtin(def) => write!(f, "<builtin {}>", def.name),
        }
    }
}
