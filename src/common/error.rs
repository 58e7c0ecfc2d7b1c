use thiserror::Error;

use super::types::Location;

/// The single diagnostic raised by the lexer, the parsers and the schema
/// registry. Renders as `{file}:{line}: {message}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{location}: {message}")]
pub struct Error {
    pub location: Location,
    pub message: String,
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Error {
            location,
            message: message.into(),
        }
    }

    /// Line the diagnostic points at
    pub fn line(&self) -> usize {
        self.location.line
    }
}
