/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of host
/// source code: unexpected tokens, unterminated strings and the like.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation and execution.
/// Runtime errors include things like division by zero, type mismatches,
/// unknown names or failed imports.
pub mod runtime_error;
/// Template compile errors.
///
/// Raised by the interpolation splitter and the AST rewriter.
pub mod template_error;
/// Unit resolution and I/O errors.
pub mod load_error;

pub use load_error::LoadError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use template_error::TemplateError;

use crate::template::diagnostics::Traceback;

/// Any failure of compiling, loading or rendering a template.
#[derive(Debug)]
pub enum Error {
    /// Host syntax error in a template file.
    Parse {
        /// The template file.
        file:  String,
        /// The syntax error.
        error: ParseError,
    },
    /// Interpolation or rewrite error.
    Template(TemplateError),
    /// A unit could not be resolved or read.
    Load(LoadError),
    /// Evaluation failed.
    Runtime {
        /// The failure.
        error:     RuntimeError,
        /// The template frames active when it was raised, outermost first.
        traceback: Traceback,
    },
    /// The entry unit does not bind a callable `render`.
    MissingRender {
        /// The entry template file.
        file: String,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse { file, error } => {
                writeln!(f, "File \"{file}\", line {}", error.line())?;
                write!(f, "SyntaxError: {error}")
            },
            Self::Template(error) => write!(f, "{error}"),
            Self::Load(error) => write!(f, "{error}"),
            Self::Runtime { error, traceback } => write!(f, "{traceback}{error}"),
            Self::MissingRender { .. } => write!(f, "no template render function defined"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse { error, .. } => Some(error),
            Self::Template(error) => Some(error),
            Self::Load(error) => Some(error),
            Self::Runtime { error, .. } => Some(error),
            Self::MissingRender { .. } => None,
        }
    }
}

impl From<TemplateError> for Error {
    fn from(error: TemplateError) -> Self {
        Self::Template(error)
    }
}

impl From<LoadError> for Error {
    fn from(error: LoadError) -> Self {
        Self::Load(error)
    }
}

impl From<RuntimeError> for Error {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime { error,
                        traceback: Traceback::default() }
    }
}
