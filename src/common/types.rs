use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// File tag used when the caller does not name the source
pub const DEFAULT_FILE: &str = "<input>";

/// First line number of a source unit unless the caller says otherwise
pub const DEFAULT_LINE: usize = 1;

/// Source position attached to diagnostics and diagnostic-bearing nodes.
///
/// Only used for error reporting; structural comparisons of AST nodes
/// ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// File tag supplied by the caller
    pub file: Arc<str>,
    /// Line number, starting at 1 (or at the caller's starting line)
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<Arc<str>>, line: usize) -> Self {
        Location {
            file: file.into(),
            line,
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new(DEFAULT_FILE, DEFAULT_LINE)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
