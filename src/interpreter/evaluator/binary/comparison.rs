use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator::{self},
    interpreter::{
        evaluator::{
            binary::core::unsupported,
            core::{Context, EvalResult},
        },
        value::core::Value::{self},
    },
};

/// Maps an equality operator and a boolean equality result to the final
/// boolean value.
#[must_use]
pub fn equality_op_result(op: BinaryOperator, is_equal: bool) -> bool {
    match op {
        BinaryOperator::Equal => is_equal,
        BinaryOperator::NotEqual => !is_equal,
        _ => unreachable!("equality_op_result used with non equality operator"),
    }
}

/// Structural equality between two values.
///
/// Integers and reals compare by numeric value. Lists compare element by
/// element with the same rules. Functions are equal only to themselves.
/// Values of unrelated types are never equal.
///
/// # Example
/// ```
/// use stencil::interpreter::{evaluator::binary::comparison::values_equal, value::core::Value};
///
/// assert!(values_equal(&Value::Integer(2), &Value::Real(2.0)));
/// assert!(!values_equal(&Value::from("2"), &Value::Integer(2)));
/// ```
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        #[allow(clippy::cast_precision_loss)]
        (Value::Integer(a), Value::Real(b)) | (Value::Real(b), Value::Integer(a)) => {
            (*a as f64) == *b
        },
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        },
        _ => left == right,
    }
}

impl Context {
    /// Evaluates a comparison of the form `Value <Operator> Value`.
    ///
    /// `==` and `!=` use [`values_equal`] and accept any pair of values.
    /// Relational operators order numbers numerically and strings
    /// lexicographically; any other combination is a type error.
    ///
    /// # Parameters
    /// - `op`: The comparison operator.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `line`: Current line number used for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Example
    /// ```
    /// use stencil::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less,
    ///                                       &Value::Integer(3),
    ///                                       &Value::Real(5.5),
    ///                                       1);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    ///
    /// let result = Context::eval_comparison(BinaryOperator::GreaterEqual,
    ///                                       &Value::from("b"),
    ///                                       &Value::from("a"),
    ///                                       1);
    /// assert_eq!(result.unwrap(), Value::Bool(true));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        Ok(Value::Bool(match op {
                           BinaryOperator::Equal | BinaryOperator::NotEqual => {
                               equality_op_result(op, values_equal(left, right))
                           },

                           BinaryOperator::Less
                           | BinaryOperator::Greater
                           | BinaryOperator::LessEqual
                           | BinaryOperator::GreaterEqual => {
                               let Some(ordering) = Self::order(left, right, line)? else {
                                   // NaN on either side
                                   return Ok(Value::Bool(false));
                               };

                               match op {
                                   BinaryOperator::Less => ordering == Ordering::Less,
                                   BinaryOperator::Greater => ordering == Ordering::Greater,
                                   BinaryOperator::LessEqual => ordering != Ordering::Greater,
                                   BinaryOperator::GreaterEqual => ordering != Ordering::Less,
                                   _ => unreachable!(),
                               }
                           },

                           _ => unreachable!(),
                       }))
    }

    fn order(left: &Value, right: &Value, line: usize) -> EvalResult<Option<Ordering>> {
        match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Some(a.cmp(b))),
            (Value::Integer(_) | Value::Real(_), Value::Integer(_) | Value::Real(_)) => {
                Ok(left.as_real(line)?.partial_cmp(&right.as_real(line)?))
            },
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            _ => Err(unsupported(BinaryOperator::Less, left, right, line)),
        }
    }

    /// Evaluates `needle in haystack`.
    ///
    /// For a string haystack the needle must be a string and the test is a
    /// substring search. For a list haystack the needle is compared to every
    /// element with [`values_equal`].
    ///
    /// # Example
    /// ```
    /// use stencil::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let list = Value::from(vec![Value::Integer(1), Value::Integer(2)]);
    /// assert_eq!(Context::eval_membership(&Value::Real(2.0), &list, 1).unwrap(),
    ///            Value::Bool(true));
    /// assert_eq!(Context::eval_membership(&Value::from("ell"), &Value::from("hello"), 1).unwrap(),
    ///            Value::Bool(true));
    /// ```
    pub fn eval_membership(needle: &Value, haystack: &Value, line: usize) -> EvalResult<Value> {
        match (needle, haystack) {
            (Value::Str(part), Value::Str(whole)) => Ok(Value::Bool(whole.contains(&**part))),
            (_, Value::List(items)) => {
                Ok(Value::Bool(items.iter().any(|item| values_equal(needle, item))))
            },
            _ => Err(unsupported(BinaryOperator::In, needle, haystack, line)),
        }
    }
}
