//! # stencil
//!
//! stencil is a text-templating compiler written in Rust.
//! Template units are small programs whose string literals may interpolate
//! expressions with `{{ ... }}`. Every expression statement inside a function
//! emits its value, and the emitted pieces are gathered into the function's
//! result. Units import each other into one shared namespace, and the entry
//! unit's `render` function produces the output.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums that represent the
/// syntactic structure of template source as a tree. The AST is built by the
/// parser, transformed by the template rewriter and walked by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches line numbers to AST nodes for error reporting.
/// - Records how each function definition is bound.
pub mod ast;
/// Provides unified error types for every phase.
///
/// This module defines the errors raised while lexing and parsing, while
/// rewriting string literals, while loading units and while evaluating. The
/// aggregate `Error` is what the public entry points return.
///
/// # Responsibilities
/// - Defines one error enum per phase.
/// - Attaches file names, line numbers and fragments for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// The host language: lexer, parser, values and evaluator.
///
/// This module knows nothing about templates. It parses and runs plain code;
/// the template layer drives it through the emission hooks and the loader.
pub mod interpreter;
/// The template layer.
///
/// Splits interpolated literals, rewrites parsed units, gathers emitted
/// values, loads units into the shared namespace and calls `render`.
pub mod template;
/// General utilities for safe numeric conversion and indexing.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Resolve possibly negative indices against a length.
pub mod util;

pub use template::driver::{RenderOptions, Rendered, render_file, render_source};
