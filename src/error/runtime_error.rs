use crate::error::Error;

#[derive(Debug)]
/// Represents all errors that can occur during evaluation and runtime.
pub enum RuntimeError {
    /// Tried to use an undefined variable.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible type.
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An argument was invalid or out of range.
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// The wrong number of arguments was supplied to a function.
    ArgumentCountMismatch {
        /// The name of the called function.
        name:     String,
        /// A description of the accepted counts.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Tried to call a value that is not a function.
    NotCallable {
        /// The type name of the value.
        type_name: &'static str,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Arithmetic operation overflowed.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to access a list or string element outside the allowed bounds.
    IndexOutOfBounds {
        /// The length of the indexed value.
        len:   usize,
        /// The index that was actually requested.
        found: i64,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An assertion failed during execution.
    AssertionFailed {
        /// The optional message passed to `assert`.
        message: Option<String>,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attempted division by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An integer was too large to be represented safely as a real.
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to use a real number where an integer was required.
    RealIsFractional {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `break`, `continue` or `return` used where it has no target.
    UnexpectedControlFlow {
        /// The offending keyword.
        keyword: &'static str,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Repetition or `range` would build a sequence longer than the limit.
    SequenceTooLong {
        /// The longest permitted length.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Function calls nested deeper than the limit.
    RecursionLimit {
        /// The deepest permitted nesting of calls.
        limit: usize,
        /// The source line of the call that exceeded it.
        line:  usize,
    },
    /// Loading a template unit failed.
    ImportFailed {
        /// The unit name as requested.
        name:  String,
        /// The source line of the import.
        line:  usize,
        /// Why the load failed.
        cause: Box<Error>,
    },
}

impl RuntimeError {
    /// Returns the source line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownVariable { line, .. }
            | Self::TypeError { line, .. }
            | Self::InvalidArgument { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::NotCallable { line, .. }
            | Self::Overflow { line }
            | Self::IndexOutOfBounds { line, .. }
            | Self::AssertionFailed { line, .. }
            | Self::DivisionByZero { line }
            | Self::LiteralTooLarge { line }
            | Self::RealIsFractional { line }
            | Self::UnexpectedControlFlow { line, .. }
            | Self::SequenceTooLong { line, .. }
            | Self::RecursionLimit { line, .. }
            | Self::ImportFailed { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name, line } => {
                write!(f, "Error on line {line}: Unknown variable '{name}'.")
            },
            Self::TypeError { details, line } => {
                write!(f, "Error on line {line}: Type error: {details}.")
            },
            Self::InvalidArgument { details, line } => {
                write!(f, "Error on line {line}: Invalid argument: {details}.")
            },
            Self::ArgumentCountMismatch { name,
                                          expected,
                                          found,
                                          line, } => write!(f,
                                                            "Error on line {line}: '{name}' takes {expected} argument(s) but {found} were given."),
            Self::NotCallable { type_name, line } => {
                write!(f, "Error on line {line}: Value of type {type_name} is not callable.")
            },
            Self::Overflow { line } => write!(f,
                                              "Error on line {line}: Integer overflow while trying to compute result."),
            Self::IndexOutOfBounds { len, found, line } => write!(f,
                                                                  "Error on line {line}: Index out of bounds. Length is {len}, but found {found} instead."),
            Self::AssertionFailed { message: Some(message),
                                    line, } => {
                write!(f, "Error on line {line}: Assertion failed: {message}")
            },
            Self::AssertionFailed { message: None,
                                    line, } => write!(f, "Error on line {line}: Assertion failed."),
            Self::DivisionByZero { line } => write!(f, "Error on line {line}: Division by zero."),
            Self::LiteralTooLarge { line } => {
                write!(f, "Error on line {line}: Integer is too large to convert.")
            },
            Self::RealIsFractional { line } => write!(f,
                                                      "Error on line {line}: Value is fractional and cannot be safely converted to an integer."),
            Self::UnexpectedControlFlow { keyword, line } => {
                write!(f, "Error on line {line}: '{keyword}' outside of its enclosing construct.")
            },
            Self::SequenceTooLong { limit, line } => {
                write!(f, "Error on line {line}: Sequence would exceed {limit} elements.")
            },
            Self::RecursionLimit { limit, line } => {
                write!(f, "Error on line {line}: Maximum call depth of {limit} exceeded.")
            },
            Self::ImportFailed { name, line, cause } => {
                write!(f, "Error on line {line}: Importing '{name}' failed:\n{cause}")
            },
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImportFailed { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}
