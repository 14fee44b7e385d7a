//! Error types for Brass core.

use brass_codec::{CodecError, FormatVersion};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type for revision operations.
pub type RevisionResult<T> = Result<T, RevisionError>;

/// Errors that can occur while reading or committing revisions.
///
/// Nothing here is retried internally. [`RevisionError::Version`] usually
/// means the database needs a format upgrade, while
/// [`RevisionError::Corrupt`] means the file should be discarded or
/// restored from backup.
#[derive(Debug, Error)]
pub enum RevisionError {
    /// A file or directory could not be opened, created, written, synced,
    /// closed, renamed or listed.
    #[error("{message}: {source}")]
    Opening {
        /// What was being attempted, including the path.
        message: String,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// A revision file's contents are malformed.
    #[error("database corrupt: {message}")]
    Corrupt {
        /// Description of the corruption.
        message: String,
    },

    /// A revision file uses a format version this build does not understand.
    #[error("{path}: Database is format version {found} but I only understand {expected}")]
    Version {
        /// The offending file.
        path: String,
        /// Version found in the file.
        found: FormatVersion,
        /// Version this build supports.
        expected: FormatVersion,
    },

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

impl RevisionError {
    /// Creates an opening error.
    pub fn opening(message: impl Into<String>, source: io::Error) -> Self {
        Self::Opening {
            message: message.into(),
            source,
        }
    }

    /// Creates a corruption error.
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Converts a decoding failure for the file at `path`.
    pub fn from_codec(path: &Path, err: CodecError) -> Self {
        match err {
            CodecError::VersionMismatch { found, expected } => Self::Version {
                path: path.display().to_string(),
                found,
                expected,
            },
            other => Self::corrupt(format!("{}: {other}", path.display())),
        }
    }

    /// Returns the OS error code behind an opening error.
    #[must_use]
    pub fn os_error_code(&self) -> Option<i32> {
        match self {
            Self::Opening { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// Returns whether this error reports malformed file contents.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }

    /// Returns whether this error reports a format version mismatch.
    #[must_use]
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::Version { .. })
    }
}
