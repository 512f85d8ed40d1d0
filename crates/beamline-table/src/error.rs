//! Errors raised while loading a table.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Failure to load or parse a table.
#[derive(Debug)]
pub enum TableError {
    /// The file could not be read.
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A data row is malformed.
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// What is wrong with the row.
        reason: String,
    },
    /// The source contains no data rows.
    Empty,
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read table '{}': {source}", path.display())
            }
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::Empty => write!(f, "table has no data rows"),
        }
    }
}

impl Error for TableError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
