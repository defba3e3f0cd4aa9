use crate::interpreter::{
    evaluator::{
        core::{Context, EvalResult},
        function::core::check_arity,
    },
    value::core::Value,
};

/// Prints a value to standard output and returns `none`.
///
/// Accepts exactly one argument, formatted using its `Display`
/// implementation. Printing bypasses the emission stack, so nothing printed
/// ends up in a gathered result.
///
/// # Parameters
/// - `args`: Slice containing one argument.
/// - `line`: Line number for error reporting.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::print::print},
///     value::core::Value,
/// };
///
/// // The function prints the value to stdout, but the doctest
/// // only checks the returned result.
/// let result = print(&mut Context::default(), &[Value::Integer(42)], 1).unwrap();
///
/// assert_eq!(result, Value::None);
/// ```
pub fn print(_: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("print", args, 1, line)?;

    println!("{}", args[0]);
    Ok(Value::None)
}
