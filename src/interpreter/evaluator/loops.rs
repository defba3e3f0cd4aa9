use crate::{
    ast::{Expr, Statement},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult, Flow},
        value::core::Value,
    },
};

impl Context {
    /// Executes a `for` loop.
    ///
    /// The iterable must evaluate to a list or a string; strings iterate over
    /// their characters. Each element is bound to the loop variable in the
    /// innermost scope before the body runs. `break` leaves the loop,
    /// `continue` skips to the next element and `return` propagates to the
    /// enclosing function.
    ///
    /// # Example
    /// ```
    /// use stencil::{
    ///     ast::{BinaryOperator, Expr, Statement},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut context = Context::default();
    /// context.assign("total", Value::Integer(0));
    ///
    /// // for x in [1, 2, 3] { total += x }
    /// let items = Expr::ListLiteral { elements: (1..=3_i64).map(|n| Expr::Literal { value: n.into(),
    ///                                                                           line:  1, })
    ///                                                  .collect(),
    ///                                 line:     1, };
    /// let body = vec![Statement::CompoundAssignment { name:  "total".to_string(),
    ///                                                 op:    BinaryOperator::Add,
    ///                                                 value: Expr::Variable { name: "x".to_string(),
    ///                                                                         line: 1, },
    ///                                                 line:  1, }];
    ///
    /// context.exec_for("x", &items, &body, 1).unwrap();
    /// assert_eq!(context.lookup_variable("total", 1).unwrap(), Value::Integer(6));
    /// ```
    pub fn exec_for(&mut self,
                    var: &str,
                    iterable: &Expr,
                    body: &[Statement],
                    line: usize)
                    -> EvalResult<Flow> {
        let items = match self.eval(iterable)? {
            Value::List(items) => items.iter().cloned().collect::<Vec<_>>(),
            Value::Str(text) => text.chars().map(|c| Value::from(c.to_string())).collect(),
            other => {
                return Err(RuntimeError::TypeError { details: format!("cannot iterate over {}",
                                                                      other.type_name()),
                                                     line });
            },
        };

        for item in items {
            self.assign(var, item);
            match self.exec_block(body)? {
                Flow::Break => break,
                Flow::Next | Flow::Continue => {},
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Next)
    }

    /// Executes a `while` loop.
    ///
    /// The condition is evaluated before every iteration using the usual
    /// truthiness rules.
    pub fn exec_while(&mut self, condition: &Expr, body: &[Statement]) -> EvalResult<Flow> {
        while self.eval(condition)?.is_truthy() {
            match self.exec_block(body)? {
                Flow::Break => break,
                Flow::Next | Flow::Continue => {},
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Next)
    }
}
