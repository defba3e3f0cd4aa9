use crate::{error::ParseError, template::splitter::MarkerImbalance};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Compile errors raised while rewriting string literals of a template unit.
///
/// Each variant carries the file, the line of the offending literal and the
/// literal's text (or the interpolated fragment), truncated for display.
pub enum TemplateError {
    /// The `{{` / `}}` markers of a literal do not pair up.
    UnbalancedMarkers {
        /// The template file.
        file:      String,
        /// The line the literal starts on.
        line:      usize,
        /// The literal text after comment stripping.
        fragment:  String,
        /// How the markers are unbalanced.
        imbalance: MarkerImbalance,
    },
    /// An interpolated segment is not a single valid expression.
    MalformedInterpolation {
        /// The template file.
        file:     String,
        /// The line of the enclosing literal.
        line:     usize,
        /// The text between the markers.
        fragment: String,
        /// The host parse failure.
        cause:    ParseError,
    },
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnbalancedMarkers { file,
                                      line,
                                      fragment,
                                      imbalance, } => {
                writeln!(f, "File \"{file}\", line {line}, in string")?;
                writeln!(f, "  {fragment}")?;
                write!(f, "SyntaxError: unbalanced interpolation braces ({imbalance})")
            },
            Self::MalformedInterpolation { file,
                                           line,
                                           fragment,
                                           cause, } => {
                writeln!(f, "File \"{file}\", line {line}, in string")?;
                writeln!(f, "  {{{{{fragment}}}}}")?;
                write!(f, "SyntaxError: malformed interpolation: {cause}")
            },
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedInterpolation { cause, .. } => Some(cause),
            Self::UnbalancedMarkers { .. } => None,
        }
    }
}
