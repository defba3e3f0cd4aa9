use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Applies a unary operator to an evaluated operand.
    ///
    /// - `Negate` works on integers and reals; integer negation is checked
    ///   for overflow.
    /// - `Not` works on any value and negates its truthiness.
    ///
    /// # Example
    /// ```
    /// use stencil::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::Integer(4), 1).unwrap();
    /// assert_eq!(v, Value::Integer(-4));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::from(""), 1).unwrap();
    /// assert_eq!(v, Value::Bool(true));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => match value {
                Value::Integer(n) => {
                    n.checked_neg()
                     .map(Value::Integer)
                     .ok_or(RuntimeError::Overflow { line })
                },
                Value::Real(r) => Ok(Value::Real(-r)),
                other => {
                    Err(RuntimeError::TypeError { details: format!("cannot negate {}",
                                                                   other.type_name()),
                                                  line })
                },
            },
            UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
        }
    }
}
