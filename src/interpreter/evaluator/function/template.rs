use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::check_arity,
        },
        value::core::Value,
    },
    template::loader,
};

/// Loads a template unit by name, exactly like an `import` statement.
///
/// The name may be any string, so units whose names are not valid dotted
/// identifiers can still be reached. Returns `none`.
pub fn load(ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("load", args, 1, line)?;

    let name = args[0].as_str(line)?;
    loader::load(ctx, name).map_err(|cause| RuntimeError::ImportFailed { name: name.to_string(),
                                                                         line,
                                                                         cause: Box::new(cause) })?;
    Ok(Value::None)
}

/// Wraps a function so that calling it gathers what it emits.
///
/// This is the decorate hook of the running context, exposed for explicit
/// use. Wrapping is idempotent and builtins are returned unchanged.
///
/// # Example
/// ```
/// use stencil::interpreter::{
///     evaluator::{core::Context, function::template::decorate},
///     value::core::Value,
/// };
///
/// let mut ctx = Context::default();
/// let len = ctx.lookup_variable("len", 1).unwrap();
///
/// assert_eq!(decorate(&mut ctx, &[len.clone()], 1).unwrap(), len);
/// assert!(decorate(&mut ctx, &[Value::Integer(1)], 1).is_err());
/// ```
pub fn decorate(ctx: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    check_arity("decorate", args, 1, line)?;

    match &args[0] {
        Value::Callable(callable) => Ok(Value::Callable((ctx.hooks.decorate)(callable.clone()))),
        other => Err(RuntimeError::NotCallable { type_name: other.type_name(),
                                                 line }),
    }
}
