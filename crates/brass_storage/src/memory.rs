//! In-memory filesystem for testing.

use crate::backend::{FileSystem, WriteHandle};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Tree {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl Tree {
    fn require_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if self.dirs.contains(parent) => Ok(()),
            _ => Err(not_found(path)),
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file or directory: {}", path.display()),
    )
}

/// An in-memory directory tree.
///
/// Cloning shares the same tree, so a test can keep one handle for
/// inspection while another is owned by the code under test.
///
/// # Thread Safety
///
/// The tree is guarded by a `RwLock`; listings, reads and renames are each
/// atomic with respect to one another.
///
/// # Example
///
/// ```rust
/// use brass_storage::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.create_dir_all(Path::new("/db")).unwrap();
/// fs.insert_file("/db/v00000000", b"bytes".to_vec());
/// assert_eq!(fs.read_prefix(Path::new("/db/v00000000"), 3).unwrap(), b"byt");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    tree: Arc<RwLock<Tree>>,
}

impl MemoryFileSystem {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a file directly into the tree, creating its parent directories.
    ///
    /// Useful for staging corrupt or foreign files in tests.
    pub fn insert_file(&self, path: impl AsRef<Path>, data: Vec<u8>) {
        let path = path.as_ref();
        let mut tree = self.tree.write();
        if let Some(parent) = path.parent() {
            for ancestor in parent.ancestors() {
                tree.dirs.insert(ancestor.to_path_buf());
            }
        }
        tree.files.insert(path.to_path_buf(), data);
    }

    /// Returns a copy of a file's contents.
    #[must_use]
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.tree.read().files.get(path.as_ref()).cloned()
    }

    /// Returns whether a file exists at `path`.
    #[must_use]
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        self.tree.read().files.contains_key(path.as_ref())
    }
}

/// A file being written through [`MemoryFileSystem`].
///
/// Bytes land in the shared tree as soon as they are written, the same way
/// a real file is visible (under its current name) before it is synced.
#[derive(Debug)]
pub struct MemoryWriter {
    tree: Arc<RwLock<Tree>>,
    path: PathBuf,
}

impl WriteHandle for MemoryWriter {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        let mut tree = self.tree.write();
        match tree.files.get_mut(&self.path) {
            Some(contents) => {
                contents.extend_from_slice(data);
                Ok(())
            }
            None => Err(not_found(&self.path)),
        }
    }

    fn sync_data(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn finish(self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    type Writer = MemoryWriter;

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let tree = self.tree.read();
        if !tree.dirs.contains(dir) {
            return Err(not_found(dir));
        }
        let files = tree.files.keys();
        let dirs = tree.dirs.iter();
        Ok(files
            .chain(dirs)
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name()?.to_str().map(str::to_owned))
            .collect())
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        let mut tree = self.tree.write();
        for ancestor in dir.ancestors() {
            tree.dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn read_prefix(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
        let tree = self.tree.read();
        let data = tree.files.get(path).ok_or_else(|| not_found(path))?;
        Ok(data[..data.len().min(limit)].to_vec())
    }

    fn create_truncate(&self, path: &Path) -> io::Result<Self::Writer> {
        let mut tree = self.tree.write();
        tree.require_parent(path)?;
        tree.files.insert(path.to_path_buf(), Vec::new());
        Ok(MemoryWriter {
            tree: Arc::clone(&self.tree),
            path: path.to_path_buf(),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut tree = self.tree.write();
        tree.require_parent(to)?;
        let data = tree.files.remove(from).ok_or_else(|| not_found(from))?;
        tree.files.insert(to.to_path_buf(), data);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.tree
            .write()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn sync_dir(&self, dir: &Path) -> io::Result<()> {
        if self.tree.read().dirs.contains(dir) {
            Ok(())
        } else {
            Err(not_found(dir))
        }
    }
}
