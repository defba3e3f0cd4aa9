/// Conversion and text builtins.
///
/// `str`, `repr`, `int`, `upper`, `lower`, `strip` and `assert`.
pub mod builtin;
/// Builtins working on sequences: `len`, `join` and `range`.
pub mod sequence;
/// The `print` function implementation.
///
/// Outputs a value to the standard output.
pub mod print;
/// Builtins that reach into the template runtime: `load` and `decorate`.
pub mod template;

pub mod core;
