//! Fault injection for the commit sequence.
//!
//! [`FaultyFileSystem`] wraps any [`FileSystem`] and fails one chosen kind
//! of operation, so tests can check what a commit leaves behind when it is
//! interrupted at each step. Every call is recorded in an operation log.
//!
//! ## Usage
//!
//! ```rust
//! use brass_storage::{FileSystem, MemoryFileSystem};
//! use brass_testkit::faulty::{FaultPoint, FaultyFileSystem};
//! use std::path::Path;
//!
//! let fs = FaultyFileSystem::new(MemoryFileSystem::new());
//! fs.fail_on(FaultPoint::Rename);
//!
//! fs.create_dir_all(Path::new("/db")).unwrap();
//! let err = fs.rename(Path::new("/db/a"), Path::new("/db/b")).unwrap_err();
//! assert!(err.to_string().contains("rename"));
//! ```

use brass_storage::{FileSystem, WriteHandle};
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    /// Listing a directory.
    List,
    /// Creating a directory.
    CreateDir,
    /// Reading a file.
    Read,
    /// Creating a file for writing.
    Create,
    /// Writing to an open file. Half of the buffer is written first.
    Write,
    /// Syncing an open file.
    Sync,
    /// Closing an open file.
    Finish,
    /// Renaming a file.
    Rename,
    /// Removing a file.
    Remove,
    /// Syncing a directory.
    SyncDir,
}

impl FaultPoint {
    /// Every fault point that can interrupt a commit, in the order a commit
    /// reaches them.
    pub const COMMIT_STEPS: [FaultPoint; 6] = [
        FaultPoint::Create,
        FaultPoint::Write,
        FaultPoint::Sync,
        FaultPoint::Finish,
        FaultPoint::Rename,
        FaultPoint::SyncDir,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::CreateDir => "create-dir",
            Self::Read => "read",
            Self::Create => "create",
            Self::Write => "write",
            Self::Sync => "sync",
            Self::Finish => "finish",
            Self::Rename => "rename",
            Self::Remove => "remove",
            Self::SyncDir => "sync-dir",
        }
    }
}

/// One recorded filesystem call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Kind of operation.
    pub point: FaultPoint,
    /// Path the operation acted on.
    pub path: PathBuf,
    /// Whether the operation was failed by injection.
    pub injected: bool,
}

#[derive(Debug, Default)]
struct FaultState {
    armed: Vec<FaultPoint>,
    log: Vec<Operation>,
}

impl FaultState {
    /// Records the call and reports whether it should fail.
    fn record(&mut self, point: FaultPoint, path: &Path) -> bool {
        let injected = match self.armed.iter().position(|&p| p == point) {
            Some(index) => {
                self.armed.remove(index);
                true
            }
            None => false,
        };
        self.log.push(Operation {
            point,
            path: path.to_path_buf(),
            injected,
        });
        injected
    }
}

/// A filesystem wrapper that fails chosen operations.
///
/// Each armed fault fires once, on the next matching call, then disarms.
#[derive(Debug)]
pub struct FaultyFileSystem<F> {
    inner: F,
    state: Arc<Mutex<FaultState>>,
}

impl<F: Clone> Clone for FaultyFileSystem<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<F: FileSystem> FaultyFileSystem<F> {
    /// Wraps `inner` with no faults armed.
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            state: Arc::new(Mutex::new(FaultState::default())),
        }
    }

    /// Arms a fault for the next call of kind `point`.
    pub fn fail_on(&self, point: FaultPoint) {
        self.state.lock().armed.push(point);
    }

    /// Disarms all faults and clears the operation log.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.armed.clear();
        state.log.clear();
    }

    /// Returns true if an armed fault has not fired yet.
    pub fn has_pending_faults(&self) -> bool {
        !self.state.lock().armed.is_empty()
    }

    /// Returns every call made so far, oldest first.
    pub fn operations(&self) -> Vec<Operation> {
        self.state.lock().log.clone()
    }

    /// Returns the kinds of call made so far, oldest first.
    pub fn operation_points(&self) -> Vec<FaultPoint> {
        self.state.lock().log.iter().map(|op| op.point).collect()
    }

    /// Returns the wrapped filesystem.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn check(&self, point: FaultPoint, path: &Path) -> io::Result<()> {
        if self.state.lock().record(point, path) {
            Err(injected(point, path))
        } else {
            Ok(())
        }
    }
}

fn injected(point: FaultPoint, path: &Path) -> io::Error {
    io::Error::other(format!("injected {} fault: {}", point.name(), path.display()))
}

impl<F: FileSystem> FileSystem for FaultyFileSystem<F> {
    type Writer = FaultyWriter<F::Writer>;

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        self.check(FaultPoint::List, dir)?;
        self.inner.list_dir(dir)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        self.check(FaultPoint::CreateDir, dir)?;
        self.inner.create_dir_all(dir)
    }

    fn read_prefix(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
        self.check(FaultPoint::Read, path)?;
        self.inner.read_prefix(path, limit)
    }

    fn create_truncate(&self, path: &Path) -> io::Result<Self::Writer> {
        self.check(FaultPoint::Create, path)?;
        Ok(FaultyWriter {
            inner: self.inner.create_truncate(path)?,
            path: path.to_path_buf(),
            state: Arc::clone(&self.state),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        self.check(FaultPoint::Rename, from)?;
        self.inner.rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.check(FaultPoint::Remove, path)?;
        self.inner.remove_file(path)
    }

    fn sync_dir(&self, dir: &Path) -> io::Result<()> {
        self.check(FaultPoint::SyncDir, dir)?;
        self.inner.sync_dir(dir)
    }
}

/// Write handle returned by [`FaultyFileSystem`].
#[derive(Debug)]
pub struct FaultyWriter<W> {
    inner: W,
    path: PathBuf,
    state: Arc<Mutex<FaultState>>,
}

impl<W: WriteHandle> FaultyWriter<W> {
    fn check(&self, point: FaultPoint) -> io::Result<()> {
        if self.state.lock().record(point, &self.path) {
            Err(injected(point, &self.path))
        } else {
            Ok(())
        }
    }
}

impl<W: WriteHandle> WriteHandle for FaultyWriter<W> {
    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if let Err(e) = self.check(FaultPoint::Write) {
            // Simulate a short write before the failure.
            self.inner.write_all(&data[..data.len() / 2])?;
            return Err(e);
        }
        self.inner.write_all(data)
    }

    fn sync_data(&mut self) -> io::Result<()> {
        self.check(FaultPoint::Sync)?;
        self.inner.sync_data()
    }

    fn finish(self) -> io::Result<()> {
        self.check(FaultPoint::Finish)?;
        self.inner.finish()
    }
}
