/// Parser entry points.
///
/// Parses whole programs, single expressions and the conditional operator.
pub mod core;

/// Unary and primary expression parsing.
///
/// Handles prefix operators, literals, grouping, list literals, lambdas and
/// the postfix call and index operators.
pub mod unary;

/// Binary operator parsing.
///
/// Implements the precedence levels from `or` down to the multiplicative
/// operators.
pub mod binary;

/// Block parsing.
///
/// Parses statement sequences enclosed in braces.
pub mod block;

/// Utility functions for the parser.
///
/// Token expectations, identifiers and comma-separated lists.
pub mod utils;

/// Statement parsing.
///
/// Definitions, control flow, imports and assignments.
pub mod statement;
