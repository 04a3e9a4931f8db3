//! Error types for matrix loading

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, LoadError>;

/// Everything that can abort a load
///
/// A load never hands back a partially filled matrix: the first error ends the
/// call and is returned as-is.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be opened
    #[error("Cannot open file '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading or rewinding the source failed
    #[error("Failed to read source: {0}")]
    Io(#[from] io::Error),

    /// A `.zip`/`.zst` container could not be read
    #[error("Failed to read archive: {0}")]
    Archive(String),

    /// `load` was called on a loader whose source is gone
    #[error("Source is not open")]
    NotOpen,

    /// No delimiter is registered for the file extension
    #[error("Unsupported file extension '{0}'; expected one of csv, tsv, txt")]
    UnsupportedExtension(String),

    /// A line produced a different number of tokens than the first line
    #[error("Wrong number of dimensions ({found}) on line {line}; should be {expected} dimensions")]
    TokenCount {
        line: usize,
        found: usize,
        expected: usize,
    },

    /// The source yielded a different number of lines on the second pass than on the first
    #[error("Source has {found} lines on the second pass but {expected} were scanned")]
    LineCount { found: usize, expected: usize },

    /// A quoted field was still open when the line ran out
    #[error("Unterminated quoted field on line {line} starting at token {column}")]
    UnterminatedQuote { line: usize, column: usize },

    /// The mapper was configured for a different dimensionality than the data has
    #[error("Given mapper has dimensionality {expected}, but data has dimensionality {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// A token could not be turned into the target element type
    #[error("Cannot convert '{token}' in dimension {dimension}: {reason}")]
    Conversion {
        token: String,
        dimension: usize,
        reason: String,
    },
}

impl LoadError {
    /// Whether the error was caused by malformed input rather than I/O or configuration
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            LoadError::TokenCount { .. }
                | LoadError::LineCount { .. }
                | LoadError::UnterminatedQuote { .. }
        )
    }

    pub(crate) fn conversion(token: &str, dimension: usize, reason: impl Into<String>) -> Self {
        LoadError::Conversion {
            token: token.to_string(),
            dimension,
            reason: reason.into(),
        }
    }
}
