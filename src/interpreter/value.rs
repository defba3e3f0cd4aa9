/// Callable values.
///
/// Defines user functions, lambdas, builtins and the gathering wrapper that
/// the emission runtime puts around template functions.
pub mod function;

pub mod core;
