use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::check_arity,
        },
        value::core::Value,
    },
    util::num::f64_to_i64_checked,
};

/// Converts a value to its string form.
///
/// Strings are returned verbatim; every other value uses its `Display`
/// form, which quotes strings nested inside lists.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::builtin::str_fn},
///     value::core::Value,
/// };
///
/// let mut ctx = Context::default();
/// let list = Value::from(vec![Value::from("a"), Value::Integer(1)]);
///
/// assert_eq!(str_fn(&mut ctx, &[list], 1).unwrap(), Value::from("[\"a\", 1]"));
/// assert_eq!(str_fn(&mut ctx, &[Value::None], 1).unwrap(), Value::from("none"));
/// ```
pub fn str_fn(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("str", args, 1, line)?;

    match &args[0] {
        Value::Str(_) => Ok(args[0].clone()),
        other => Ok(other.to_string().into()),
    }
}

/// Returns the source-like representation of a value.
pub fn repr(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("repr", args, 1, line)?;

    Ok(args[0].repr().into())
}

/// Converts a value to an integer.
///
/// - Integers are returned as-is and booleans become `0` or `1`.
/// - Reals are truncated toward zero.
/// - Strings are parsed after trimming surrounding whitespace.
///
/// Anything else, or a string that is not a number, is an
/// `InvalidArgument` error.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::builtin::int},
///     value::core::Value,
/// };
///
/// let mut ctx = Context::default();
///
/// assert_eq!(int(&mut ctx, &[Value::Real(-2.7)], 1).unwrap(), Value::Integer(-2));
/// assert_eq!(int(&mut ctx, &[Value::from(" 42 ")], 1).unwrap(), Value::Integer(42));
/// assert!(int(&mut ctx, &[Value::from("4x")], 1).is_err());
/// ```
pub fn int(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("int", args, 1, line)?;

    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        Value::Real(r) => Ok(Value::Integer(f64_to_i64_checked(r.trunc(), line)?)),
        Value::Str(s) => {
            s.trim()
             .parse::<i64>()
             .map(Value::Integer)
             .map_err(|_| {
                 let details = format!("invalid integer literal {}", args[0].repr());
                 RuntimeError::InvalidArgument { details, line }
             })
        },
        other => {
            Err(RuntimeError::InvalidArgument { details: format!("cannot convert {} to int",
                                                                 other.type_name()),
                                                line })
        },
    }
}

/// Applies a string transformation selected by name.
///
/// Supported names are `upper`, `lower` and `strip`. The argument must be a
/// string.
///
/// # Example
/// ```
/// use stencil::interpreter::{evaluator::function::builtin::map_text, value::core::Value};
///
/// let r = map_text("strip", &[Value::from("  hi \n")], 1).unwrap();
/// assert_eq!(r, Value::from("hi"));
///
/// let r = map_text("upper", &[Value::from("hi")], 1).unwrap();
/// assert_eq!(r, Value::from("HI"));
/// ```
pub fn map_text(name: &str, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity(name, args, 1, line)?;

    let text = args[0].as_str(line)?;
    Ok(match name {
           "upper" => text.to_uppercase().into(),
           "lower" => text.to_lowercase().into(),
           "strip" => text.trim().into(),
           _ => unreachable!("map_text used with unknown operation"),
       })
}

/// Asserts that a condition is truthy.
///
/// Accepts the condition and an optional message. A falsy condition raises
/// `AssertionFailed` carrying the message; otherwise `none` is returned.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::builtin::assert_fn},
///     value::core::Value,
/// };
///
/// let mut ctx = Context::default();
///
/// assert!(assert_fn(&mut ctx, &[Value::Integer(1)], 1).is_ok());
/// let err = assert_fn(&mut ctx, &[Value::Bool(false), Value::from("boom")], 3).unwrap_err();
/// assert_eq!(err.to_string(), "Error on line 3: Assertion failed: boom");
/// ```
pub fn assert_fn(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    if !matches!(args.len(), 1 | 2) {
        return Err(RuntimeError::ArgumentCountMismatch { name: "assert".to_string(),
                                                         expected: "1 or 2".to_string(),
                                                         found: args.len(),
                                                         line });
    }

    if !args[0].is_truthy() {
        return Err(RuntimeError::AssertionFailed { message: args.get(1).map(ToString::to_string),
                                                   line });
    }
    Ok(Value::None)
}
