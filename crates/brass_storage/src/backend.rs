//! Filesystem trait definitions.

use std::io;
use std::path::Path;
use std::sync::Arc;

/// A file opened for writing by [`FileSystem::create_truncate`].
///
/// The handle is released when it is dropped. Callers that care about the
/// outcome of closing call [`WriteHandle::finish`] instead.
pub trait WriteHandle: Send {
    /// Writes the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if any byte could not be written.
    fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Forces written data to stable storage.
    ///
    /// After this returns successfully the file contents survive a crash.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    fn sync_data(&mut self) -> io::Result<()>;

    /// Closes the file, reporting any deferred write error.
    ///
    /// # Errors
    ///
    /// Returns an error if buffered data could not be written out.
    fn finish(self) -> io::Result<()>;
}

/// The operating-system primitives the revision manager depends on.
///
/// # Invariants
///
/// - `rename` atomically replaces the destination: a concurrent `list_dir`
///   sees either the old entry set or the new one
/// - `read_prefix` never returns more than `limit` bytes
/// - `sync_data` on a [`WriteHandle`] makes its contents durable
///
/// # Implementors
///
/// - [`super::OsFileSystem`] - For persistent databases
/// - [`super::MemoryFileSystem`] - For testing
pub trait FileSystem: Send + Sync {
    /// Handle type returned by [`FileSystem::create_truncate`].
    type Writer: WriteHandle;

    /// Lists the names of the entries in `dir`.
    ///
    /// Names that are not valid UTF-8 are skipped; no revision file can have
    /// such a name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be opened or read.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>>;

    /// Creates `dir` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created.
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    /// Opens `path` read-only and reads at most `limit` bytes from its start.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_prefix(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>>;

    /// Creates `path`, truncating it if it already exists, and opens it for
    /// writing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    fn create_truncate(&self, path: &Path) -> io::Result<Self::Writer>;

    /// Atomically renames `from` to `to`, replacing `to` if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails; `from` is left in place.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Removes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be removed.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Makes directory metadata (created, renamed and removed entries)
    /// durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be synced.
    fn sync_dir(&self, dir: &Path) -> io::Result<()>;
}

impl<T: FileSystem> FileSystem for Arc<T> {
    type Writer = T::Writer;

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        (**self).list_dir(dir)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        (**self).create_dir_all(dir)
    }

    fn read_prefix(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
        (**self).read_prefix(path, limit)
    }

    fn create_truncate(&self, path: &Path) -> io::Result<Self::Writer> {
        (**self).create_truncate(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn sync_dir(&self, dir: &Path) -> io::Result<()> {
        (**self).sync_dir(dir)
    }
}
