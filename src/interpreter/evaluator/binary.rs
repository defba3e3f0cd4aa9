/// Binary operator dispatch.
///
/// Routes every non-short-circuiting operator to the handler for its operand
/// types.
pub mod core;

/// Arithmetic on numbers, strings and lists.
///
/// Implements `+`, `-`, `*`, `/` and `%`, including string and list
/// concatenation and repetition.
pub mod scalar;

/// Comparison and membership.
///
/// Implements equality, ordering and the `in` operator.
pub mod comparison;
