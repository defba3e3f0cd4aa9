use std::rc::Rc;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::unsupported,
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
    util::num::{i64_to_f64_checked, repeat_count},
};

impl Context {
    /// Evaluates `+`, `-`, `*`, `/` and `%`.
    ///
    /// - Two integers stay integers, with overflow checking, except for `/`,
    ///   which always produces a real.
    /// - An integer mixed with a real is promoted to real.
    /// - `+` concatenates two strings or two lists.
    /// - `*` repeats a string or list by an integer count.
    /// - `%` follows the sign of the divisor.
    ///
    /// # Example
    /// ```
    /// use stencil::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_arithmetic(BinaryOperator::Div, &Value::Integer(7), &Value::Integer(2), 1).unwrap();
    /// assert_eq!(v, Value::Real(3.5));
    ///
    /// let v = Context::eval_arithmetic(BinaryOperator::Mod, &Value::Integer(-7), &Value::Integer(3), 1).unwrap();
    /// assert_eq!(v, Value::Integer(2));
    ///
    /// let v = Context::eval_arithmetic(BinaryOperator::Mul, &Value::from("ab"), &Value::Integer(3), 1).unwrap();
    /// assert_eq!(v, Value::from("ababab"));
    ///
    /// let list = Value::from(vec![Value::Integer(1)]);
    /// let v = Context::eval_arithmetic(BinaryOperator::Mul, &list, &Value::Integer(2), 1).unwrap();
    /// assert_eq!(v, Value::from(vec![Value::Integer(1), Value::Integer(1)]));
    /// ```
    pub fn eval_arithmetic(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        use Value::{Integer, List, Real, Str};

        match (left, right) {
            (Integer(a), Integer(b)) => Self::eval_integer_op(op, *a, *b, line),
            (Integer(_) | Real(_), Integer(_) | Real(_)) => {
                Self::eval_real_op(op, left.as_real(line)?, right.as_real(line)?, line)
            },
            (Str(a), Str(b)) if op == BinaryOperator::Add => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Ok(joined.into())
            },
            (List(a), List(b)) if op == BinaryOperator::Add => {
                Ok(a.iter().chain(b.iter()).cloned().collect::<Vec<_>>().into())
            },
            (Str(text), Integer(count)) | (Integer(count), Str(text))
                if op == BinaryOperator::Mul =>
            {
                Ok(text.repeat(repeat_count(text.len(), *count, line)?).into())
            },
            (List(items), Integer(count)) | (Integer(count), List(items))
                if op == BinaryOperator::Mul =>
            {
                let copies = repeat_count(items.len(), *count, line)?;
                let repeated = std::iter::repeat_n(items.iter(), copies).flatten()
                                                                      .cloned()
                                                                      .collect::<Vec<_>>();
                Ok(Value::List(Rc::new(repeated)))
            },
            _ => Err(unsupported(op, left, right, line)),
        }
    }

    fn eval_integer_op(op: BinaryOperator, a: i64, b: i64, line: usize) -> EvalResult<Value> {
        let result = match op {
            BinaryOperator::Add => a.checked_add(b),
            BinaryOperator::Sub => a.checked_sub(b),
            BinaryOperator::Mul => a.checked_mul(b),
            BinaryOperator::Div => {
                let a = i64_to_f64_checked(a, RuntimeError::LiteralTooLarge { line })?;
                let b = i64_to_f64_checked(b, RuntimeError::LiteralTooLarge { line })?;
                return Self::eval_real_op(BinaryOperator::Div, a, b, line);
            },
            BinaryOperator::Mod => {
                if b == 0 {
                    return Err(RuntimeError::DivisionByZero { line });
                }
                a.checked_rem(b).map(|r| if r != 0 && (r < 0) != (b < 0) { r + b } else { r })
            },
            _ => unreachable!("eval_integer_op used with non arithmetic operator"),
        };
        result.map(Value::Integer)
              .ok_or(RuntimeError::Overflow { line })
    }

    fn eval_real_op(op: BinaryOperator, a: f64, b: f64, line: usize) -> EvalResult<Value> {
        Ok(Value::Real(match op {
                           BinaryOperator::Add => a + b,
                           BinaryOperator::Sub => a - b,
                           BinaryOperator::Mul => a * b,
                           BinaryOperator::Div => {
                               if b == 0.0 {
                                   return Err(RuntimeError::DivisionByZero { line });
                               }
                               a / b
                           },
                           BinaryOperator::Mod => {
                               if b == 0.0 {
                                   return Err(RuntimeError::DivisionByZero { line });
                               }
                               a - b * (a / b).floor()
                           },
                           _ => unreachable!("eval_real_op used with non arithmetic operator"),
                       }))
    }
}
