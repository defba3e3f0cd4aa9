use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::check_arity,
        },
        value::core::Value,
    },
    util::num::{check_sequence_len, usize_to_i64_checked},
};

/// Returns the number of elements of a list or characters of a string.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::sequence::len},
///     value::core::Value,
/// };
///
/// let mut ctx = Context::default();
///
/// assert_eq!(len(&mut ctx, &[Value::from("héllo")], 1).unwrap(), Value::Integer(5));
/// assert!(len(&mut ctx, &[Value::Integer(5)], 1).is_err());
/// ```
pub fn len(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("len", args, 1, line)?;

    let n = match &args[0] {
        Value::Str(text) => text.chars().count(),
        Value::List(items) => items.len(),
        other => {
            return Err(RuntimeError::TypeError { details: format!("{} has no length",
                                                                  other.type_name()),
                                                 line });
        },
    };
    Ok(Value::Integer(usize_to_i64_checked(n, line)?))
}

/// Joins the elements of a list with a separator.
///
/// Elements are stringified the same way `str` does it.
///
/// # Parameters
/// - `args`: The separator string followed by the list.
/// - `line`: Line number for error reporting.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::sequence::join},
///     value::core::Value,
/// };
///
/// let items = Value::from(vec![Value::from("a"), Value::Integer(2)]);
/// let joined = join(&mut Context::default(), &[Value::from(", "), items], 1).unwrap();
///
/// assert_eq!(joined, Value::from("a, 2"));
/// ```
pub fn join(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("join", args, 2, line)?;

    let separator = args[0].as_str(line)?;
    let parts = args[1].as_list(line)?
                       .iter()
                       .map(ToString::to_string)
                       .collect::<Vec<_>>();

    Ok(parts.join(separator).into())
}

/// Builds a list of consecutive integers.
///
/// `range(n)` counts from `0` up to but excluding `n`; `range(a, b)` counts
/// from `a` up to but excluding `b`. An empty range yields an empty list.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::sequence::range},
///     value::core::Value,
/// };
///
/// let mut ctx = Context::default();
///
/// let r = range(&mut ctx, &[Value::Integer(2), Value::Integer(4)], 1).unwrap();
/// assert_eq!(r, Value::from(vec![Value::Integer(2), Value::Integer(3)]));
///
/// let r = range(&mut ctx, &[Value::Integer(-1)], 1).unwrap();
/// assert_eq!(r, Value::from(Vec::new()));
///
/// assert!(range(&mut ctx, &[Value::Integer(i64::MIN), Value::Integer(i64::MAX)], 1).is_err());
/// ```
pub fn range(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let (start, end) = match args {
        [end] => (0, end.as_integer(line)?),
        [start, end] => (start.as_integer(line)?, end.as_integer(line)?),
        _ => {
            return Err(RuntimeError::ArgumentCountMismatch { name: "range".to_string(),
                                                             expected: "1 or 2".to_string(),
                                                             found: args.len(),
                                                             line });
        },
    };

    let len = usize::try_from(i128::from(end) - i128::from(start)).unwrap_or(0);
    check_sequence_len(len, line)?;

    Ok((start..end).map(Value::Integer).collect::<Vec<_>>().into())
}
