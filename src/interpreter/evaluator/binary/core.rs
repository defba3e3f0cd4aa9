use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation between two values.
    ///
    /// Arithmetic operators go to `eval_arithmetic`, relational and equality
    /// operators to `eval_comparison` and `in` to `eval_membership`. The
    /// logical operators are normally short-circuited by the expression
    /// evaluator; here they only see already evaluated operands.
    ///
    /// # Example
    /// ```
    /// use stencil::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add,
    ///                                   &Value::Integer(3),
    ///                                   &Value::Integer(4),
    ///                                   1);
    /// assert_eq!(result.unwrap(), Value::Integer(7));
    ///
    /// let result = Context::eval_binary(BinaryOperator::Add,
    ///                                   &Value::from("a"),
    ///                                   &Value::Integer(4),
    ///                                   1);
    /// assert!(result.is_err());
    /// ```
    pub fn eval_binary(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Div, Equal, Greater, GreaterEqual, In, Less, LessEqual, Mod, Mul, NotEqual,
            Or, Sub,
        };

        match op {
            Add | Sub | Mul | Div | Mod => Self::eval_arithmetic(op, left, right, line),
            Less | Greater | LessEqual | GreaterEqual | Equal | NotEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            In => Self::eval_membership(left, right, line),
            And => Ok(if left.is_truthy() { right.clone() } else { left.clone() }),
            Or => Ok(if left.is_truthy() { left.clone() } else { right.clone() }),
        }
    }
}

/// Builds the error for an operator applied to unsupported operand types.
pub(crate) fn unsupported(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          line: usize)
                          -> RuntimeError {
    RuntimeError::TypeError { details: format!("Cannot use {op} on {} and {}",
                                                left.type_name(),
                                                right.type_name()),
                              line }
}
