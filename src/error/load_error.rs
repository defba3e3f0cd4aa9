use std::path::PathBuf;

#[derive(Debug)]
/// Errors raised while resolving or reading a template unit.
pub enum LoadError {
    /// No search directory holds the unit's file.
    NotFound {
        /// The unit name as requested.
        name:     String,
        /// The file name that was looked for.
        file:     String,
        /// Every directory that was searched, in order.
        searched: Vec<PathBuf>,
    },
    /// The unit's file exists but could not be read.
    Io {
        /// The resolved path.
        path:   PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { name, file, searched } => {
                write!(f, "import template, file not found: {file} (unit '{name}'")?;
                if searched.is_empty() {
                    write!(f, ", no search directories)")
                } else {
                    let dirs = searched.iter()
                                       .map(|dir| dir.display().to_string())
                                       .collect::<Vec<_>>();
                    write!(f, ", searched {})", dirs.join(", "))
                }
            },
            Self::Io { path, source } => {
                write!(f, "Cannot read template '{}': {source}", path.display())
            },
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}
