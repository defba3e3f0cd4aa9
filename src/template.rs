use tracing::debug;

use crate::{
    ast::Statement,
    error::Error,
    interpreter::{lexer::tokenize, parser::core::parse_program},
};

/// Splitting string literals into literal text and interpolated expressions.
///
/// Strips `##` comments and pairs the `{{` / `}}` markers.
pub mod splitter;

/// The rewrite pass that turns a parsed unit into template code.
///
/// Desugars interpolated literals, turns expression statements into emits
/// and marks function definitions for gathering.
pub mod rewriter;

/// The runtime side of gathering: buffers, hooks and warnings.
pub mod emission;

/// Unit resolution, caching and execution.
pub mod loader;

/// Entry points that run a template and call its `render` function.
pub mod driver;

/// Call traces and tracebacks for error reports.
pub mod diagnostics;

/// Compiles template source into rewritten statements.
///
/// Lexes and parses the source as host code, then applies the rewrite
/// rules. Nothing is executed.
///
/// # Errors
/// `Error::Parse` for host syntax errors and `Error::Template` for
/// interpolation errors, both naming `file`.
///
/// # Example
/// ```
/// use stencil::{ast::Statement, template::compile};
///
/// let statements = compile("x = 1\n\"x={{x}}\"", "demo.tmpl").unwrap();
/// assert!(matches!(statements[1], Statement::Emit { .. }));
///
/// assert!(compile("\"{{x\"", "demo.tmpl").is_err());
/// ```
pub fn compile(source: &str, file: &str) -> Result<Vec<Statement>, Error> {
    let parsed = tokenize(source, 1).and_then(|tokens| parse_program(&mut tokens.iter().peekable()))
                                    .map_err(|error| Error::Parse { file: file.to_string(),
                                                                    error })?;
    let statements = rewriter::rewrite_program(parsed, file)?;

    debug!(file, statements = statements.len(), "compiled template unit");
    Ok(statements)
}
