/// Binary operator evaluation logic.
///
/// Handles arithmetic, comparisons and membership tests between two values.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the expression evaluator, the statement executor and the runtime
/// context shared by everything that runs template code.
pub mod core;

/// Evaluation of `for` and `while` loops.
pub mod loops;

/// Utility functions for evaluation.
///
/// Variable lookup and assignment, indexing, and function value creation.
pub mod utils;

/// Function evaluation.
///
/// Handles user-defined and built-in function calls, argument checking, and
/// return value computation.
pub mod function;
