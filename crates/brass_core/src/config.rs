//! Revision manager configuration.

use brass_codec::HEADER_SIZE;

/// Configuration for opening and committing revisions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether `create` makes the database directory if it doesn't exist.
    pub create_if_missing: bool,

    /// Whether to fsync the directory after publishing a revision, making
    /// the rename itself durable.
    pub sync_directory: bool,

    /// Maximum number of bytes read from a revision file. Anything longer is
    /// reported as junk at the end.
    read_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            sync_directory: true,
            read_limit: 256,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to create the database directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Sets whether to sync the directory after each commit.
    #[must_use]
    pub const fn sync_directory(mut self, value: bool) -> Self {
        self.sync_directory = value;
        self
    }

    /// Sets the maximum revision file size read. Never below the header size.
    #[must_use]
    pub fn read_limit(mut self, bytes: usize) -> Self {
        self.read_limit = bytes.max(HEADER_SIZE);
        self
    }

    /// Returns the maximum number of bytes read from a revision file.
    #[must_use]
    pub const fn max_read(&self) -> usize {
        self.read_limit
    }
}
