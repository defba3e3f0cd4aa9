use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    ast::{BinaryOperator, Expr, Statement},
    error::RuntimeError,
    interpreter::{namespace::Namespace, value::core::Value},
    template::{
        diagnostics::CallTrace,
        emission::{AccumulationStack, DiscardedGather, Hooks},
        loader::{self, Loader},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// A local variable frame of a running function.
pub type Frame = HashMap<String, Value>;

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Continue with the next statement.
    Next,
    /// Leave the enclosing function with a value.
    Return(Value),
    /// Leave the enclosing loop.
    Break,
    /// Start the next iteration of the enclosing loop.
    Continue,
}

/// Stores the runtime evaluation context.
///
/// This struct holds all interpreter state of one render: the shared
/// namespace, the local frames of running functions, the emission stack, the
/// emission hooks, the unit loader and the call trace used for diagnostics.
/// Nothing is global, so independent contexts never observe each other.
///
/// ## Usage
///
/// A `Context` is created once per render and passed to every unit that is
/// loaded, so that all units share the same namespace and cache.
pub struct Context {
    /// Bindings shared by every executed unit.
    pub namespace:         Namespace,
    /// Local frames of running functions, innermost last.
    pub(crate) frames:     Vec<Frame>,
    /// The accumulation stack; emission frames hold clones of the handle.
    pub(crate) emission:   Rc<RefCell<AccumulationStack>>,
    /// The emission hooks the evaluator calls.
    pub hooks:             Hooks,
    /// Unit resolution and cache.
    pub loader:            Loader,
    /// Frames of user functions and units currently running.
    pub(crate) trace:      CallTrace,
    /// Gathered values that were discarded, in the order they happened.
    pub warnings:          Vec<DiscardedGather>,
    /// Files whose code is running, innermost last.
    pub(crate) files:      Vec<Rc<str>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Loader::default())
    }
}

impl Context {
    /// Creates a new evaluation context with an empty namespace, the default
    /// emission hooks and the given loader.
    #[must_use]
    pub fn new(loader: Loader) -> Self {
        Self { namespace: Namespace::default(),
               frames: Vec::new(),
               emission: Rc::new(RefCell::new(AccumulationStack::default())),
               hooks: Hooks::default(),
               loader,
               trace: CallTrace::default(),
               warnings: Vec::new(),
               files: Vec::new() }
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation.
    /// The evaluator dispatches based on expression variant.
    ///
    /// # Example
    /// ```
    /// use stencil::{
    ///     ast::Expr,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut ctx = Context::default();
    /// let expr = Expr::Concat { parts: vec![Expr::Str { value: "n=".to_string(),
    ///                                                   line:  1, },
    ///                                       Expr::Stringify { expr: Box::new(Expr::Literal { value: 2.into(),
    ///                                                                                        line:  1, }),
    ///                                                         line: 1, }],
    ///                           line:  1, };
    ///
    /// assert_eq!(ctx.eval(&expr).unwrap(), Value::from("n=2"));
    /// ```
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Str { value, .. } => Ok(Value::from(value.as_str())),
            Expr::Concat { parts, .. } => {
                let mut out = String::new();
                for part in parts {
                    match self.eval(part)? {
                        Value::Str(s) => out.push_str(&s),
                        other => out.push_str(&other.to_string()),
                    }
                }
                Ok(out.into())
            },
            Expr::Stringify { expr, .. } => Ok(self.eval(expr)?.to_string().into()),
            Expr::Variable { name, line } => self.lookup_variable(name, *line),
            Expr::UnaryOp { op, expr, line } => {
                let value = self.eval(expr)?;
                Self::eval_unary(*op, &value, *line)
            },
            Expr::BinaryOp { left,
                             op,
                             right,
                             line, } => self.eval_binary_op(left, *op, right, *line),
            Expr::Conditional { condition,
                                then_branch,
                                else_branch,
                                .. } => {
                if self.eval(condition)?.is_truthy() {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            },
            Expr::Call { callee,
                         arguments,
                         line, } => {
                let callee = self.eval(callee)?;
                let args = arguments.iter()
                                    .map(|arg| self.eval(arg))
                                    .collect::<EvalResult<Vec<_>>>()?;
                self.call_value(&callee, args, *line)
            },
            Expr::Index { target, index, line } => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                Self::eval_index(&target, &index, *line)
            },
            Expr::ListLiteral { elements, .. } => {
                let items = elements.iter()
                                    .map(|element| self.eval(element))
                                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(items.into())
            },
            Expr::Lambda { params, body, line } => Ok(self.make_lambda(params, body, *line)),
        }
    }

    /// Executes a single statement.
    ///
    /// Statements may bind names, emit values, load units or redirect
    /// control flow; the returned [`Flow`] tells the enclosing block how to
    /// continue.
    pub fn exec_statement(&mut self, statement: &Statement) -> EvalResult<Flow> {
        match statement {
            Statement::Function(def) => {
                self.define_function(def);
                Ok(Flow::Next)
            },
            Statement::Expression { expr, .. } => {
                self.eval(expr)?;
                Ok(Flow::Next)
            },
            Statement::Emit { expr, .. } => {
                let value = self.eval(expr)?;
                self.gather(&value);
                Ok(Flow::Next)
            },
            Statement::Assignment { name, value, .. } => {
                let value = self.eval(value)?;
                self.assign(name, value);
                Ok(Flow::Next)
            },
            Statement::CompoundAssignment { name,
                                            op,
                                            value,
                                            line, } => {
                let old_value = self.lookup_variable(name, *line)?;
                let rhs_value = self.eval(value)?;
                let result = Self::eval_binary(*op, &old_value, &rhs_value, *line)?;
                self.assign(name, result);
                Ok(Flow::Next)
            },
            Statement::IndexAssignment { name,
                                         index,
                                         value,
                                         line, } => {
                let index = self.eval(index)?;
                let value = self.eval(value)?;
                self.assign_index(name, &index, value, *line)?;
                Ok(Flow::Next)
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                if self.eval(condition)?.is_truthy() {
                    self.exec_block(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_block(else_branch)
                } else {
                    Ok(Flow::Next)
                }
            },
            Statement::For { var,
                             iterable,
                             body,
                             line, } => self.exec_for(var, iterable, body, *line),
            Statement::While { condition, body, .. } => self.exec_while(condition, body),
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            },
            Statement::Break { .. } => Ok(Flow::Break),
            Statement::Continue { .. } => Ok(Flow::Continue),
            Statement::Import { name, line } => {
                self.trace.mark(*line);
                loader::load(self, name).map_err(|cause| {
                                            RuntimeError::ImportFailed { name: name.clone(),
                                                                         line: *line,
                                                                         cause: Box::new(cause) }
                                        })?;
                Ok(Flow::Next)
            },
        }
    }

    /// Executes statements in order until one of them leaves the block.
    pub fn exec_block(&mut self, statements: &[Statement]) -> EvalResult<Flow> {
        for statement in statements {
            match self.exec_statement(statement)? {
                Flow::Next => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    /// Executes the top level of a template unit against the shared
    /// namespace.
    ///
    /// Local frames of any function that triggered the load are hidden while
    /// the unit runs, so its assignments always land in the namespace.
    pub fn exec_unit(&mut self, statements: &[Statement], file: &str) -> EvalResult<()> {
        let saved_frames = std::mem::take(&mut self.frames);
        self.files.push(file.into());
        self.trace.enter("<unit>", file, 0);

        let result = match self.exec_block(statements) {
            Ok(Flow::Next) => Ok(()),
            Ok(flow) => Err(RuntimeError::UnexpectedControlFlow { keyword: flow_keyword(&flow),
                                                                  line:    0, }),
            Err(error) => Err(error),
        };

        self.trace.leave(result.as_ref().err().map(RuntimeError::line));
        self.files.pop();
        self.frames = saved_frames;
        result
    }

    /// Evaluates a binary expression, short-circuiting `and` and `or`.
    ///
    /// Like their Python counterparts, `and` and `or` return one of their
    /// operands rather than a boolean.
    fn eval_binary_op(&mut self,
                      left: &Expr,
                      op: BinaryOperator,
                      right: &Expr,
                      line: usize)
                      -> EvalResult<Value> {
        let left = self.eval(left)?;
        match op {
            BinaryOperator::And if !left.is_truthy() => Ok(left),
            BinaryOperator::Or if left.is_truthy() => Ok(left),
            BinaryOperator::And | BinaryOperator::Or => self.eval(right),
            _ => {
                let right = self.eval(right)?;
                Self::eval_binary(op, &left, &right, line)
            },
        }
    }
}

/// Names the keyword that produced a control-flow signal.
pub(crate) const fn flow_keyword(flow: &Flow) -> &'static str {
    match flow {
        Flow::Next => "",
        Flow::Return(_) => "return",
        Flow::Break => "break",
        Flow::Continue => "continue",
    }
}
