//! Filesystem implementation backed by `std::fs`.

use crate::backend::{FileSystem, WriteHandle};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

/// The operating system's filesystem.
///
/// # Durability
///
/// - [`OsWriter::sync_data`] flushes the write buffer and calls
///   `File::sync_data()`
/// - [`FileSystem::sync_dir`] calls `File::sync_all()` on the directory
///   (Unix only)
///
/// # Example
///
/// ```no_run
/// use brass_storage::{FileSystem, OsFileSystem};
/// use std::path::Path;
///
/// let fs = OsFileSystem::new();
/// let names = fs.list_dir(Path::new("my_db")).unwrap();
/// println!("{names:?}");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    /// Creates a handle to the real filesystem.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// A file being written through [`OsFileSystem`].
#[derive(Debug)]
pub struct OsWriter {
    inner: BufWriter<File>,
}

impl WriteHandle for OsWriter {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.inner.write_all(data)
    }

    fn sync_data(&mut self) -> io::Result<()> {
        self.inner.flush()?;
        self.inner.get_ref().sync_data()
    }

    fn finish(self) -> io::Result<()> {
        // std ignores errors from close(2); anything still buffered is
        // written here so the failure is reported rather than lost.
        let file = self.inner.into_inner().map_err(io::IntoInnerError::into_error)?;
        drop(file);
        Ok(())
    }
}

impl FileSystem for OsFileSystem {
    type Writer = OsWriter;

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn read_prefix(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
        let file = File::open(path)?;
        let mut data = Vec::with_capacity(limit.min(4096));
        file.take(limit as u64).read_to_end(&mut data)?;
        Ok(data)
    }

    fn create_truncate(&self, path: &Path) -> io::Result<Self::Writer> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(OsWriter {
            inner: BufWriter::new(file),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    #[cfg(unix)]
    fn sync_dir(&self, dir: &Path) -> io::Result<()> {
        File::open(dir)?.sync_all()
    }

    #[cfg(not(unix))]
    fn sync_dir(&self, _dir: &Path) -> io::Result<()> {
        // NTFS journals metadata; directories cannot be opened for fsync.
        Ok(())
    }
}
