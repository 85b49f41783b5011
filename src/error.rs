use std::{
    fmt::{self, Display},
    path::PathBuf,
};

/// The ways a run can fail.
///
/// Library functions return [`anyhow::Result`]; when the failure is one of
/// these kinds, it can be recovered with `err.downcast_ref::<Error>()`.
#[derive(Debug)]
pub enum Error {
    /// A listed input path does not exist.
    FileNotFound(PathBuf),
    /// An input file has a missing, malformed, or mismatched header, or is
    /// not valid CSV.
    Format { path: PathBuf, reason: String },
    /// An input file exists but could not be read.
    Io { path: PathBuf, source: std::io::Error },
    /// The requested report is not in the registry.
    UnknownReport { name: String, known: Vec<String> },
    /// A row value could not be coerced to what a report needs.
    Value { location: String, reason: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            Error::Format { path, reason } => write!(f, "{}: {reason}", path.display()),
            Error::Io { path, source } => write!(f, "reading {}: {source}", path.display()),
            Error::UnknownReport { name, known } => {
                write!(f, "unknown report {name:?} (available: {})", known.join(", "))
            }
            Error::Value { location, reason } => write!(f, "{location}: {reason}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
