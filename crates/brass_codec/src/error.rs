//! Error types for the codec crate.

use crate::types::Table;
use crate::version::FormatVersion;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while decoding a revision file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended in the middle of a packed integer.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A packed integer does not fit in 64 bits.
    #[error("integer overflow")]
    IntegerOverflow,

    /// Fewer bytes than the fixed header.
    #[error("Rev file too short: {len} bytes")]
    TooShort {
        /// Number of bytes available.
        len: usize,
    },

    /// The magic signature does not match.
    #[error("Rev file magic incorrect")]
    BadMagic,

    /// The file was written by a different format version.
    #[error("Database is format version {found} but I only understand {expected}")]
    VersionMismatch {
        /// Version stored in the file.
        found: FormatVersion,
        /// Version this build reads and writes.
        expected: FormatVersion,
    },

    /// A table root could not be decoded.
    #[error("Rev file roots: bad entry for {table} table")]
    BadRoot {
        /// The table whose entry is malformed.
        table: Table,
    },

    /// Bytes remain after the last table root.
    #[error("Rev file has junk at end ({extra} bytes)")]
    TrailingJunk {
        /// Number of unexpected bytes.
        extra: usize,
    },
}
