//! Test fixtures and database helpers.
//!
//! Provides convenience functions for setting up test databases
//! and common test scenarios.

use crate::faulty::FaultyFileSystem;
use brass_core::{
    Config, FileSystem, FixedUuid, MemoryFileSystem, OsFileSystem, RevisionNumber,
    RevisionResult, RevisionState,
};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// UUID given to every fixture database.
pub const TEST_UUID: Uuid = Uuid::from_u128(0x5eed_0000_0000_4000_8000_0000_0000_0001);

/// A created test database with automatic cleanup.
///
/// Dereferences to its [`RevisionState`].
pub struct TestDatabase<F: FileSystem + Clone = OsFileSystem> {
    /// The revision state.
    pub state: RevisionState<F, FixedUuid>,
    dir: PathBuf,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestDatabase<OsFileSystem> {
    /// Creates a database in a new temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().join("db");
        let mut test_db = Self::with_fs(OsFileSystem::new(), dir, Config::default());
        test_db._temp_dir = Some(temp_dir);
        test_db
    }
}

impl TestDatabase<MemoryFileSystem> {
    /// Creates a database on an in-memory filesystem.
    pub fn memory() -> Self {
        Self::with_fs(MemoryFileSystem::new(), PathBuf::from("/db"), Config::default())
    }
}

impl TestDatabase<FaultyFileSystem<MemoryFileSystem>> {
    /// Creates a database on a fault-injecting in-memory filesystem.
    ///
    /// No faults are armed and the operation log is empty once this returns.
    pub fn faulty() -> Self {
        let fs = FaultyFileSystem::new(MemoryFileSystem::new());
        let test_db = Self::with_fs(fs, PathBuf::from("/db"), Config::default());
        test_db.fs().reset();
        test_db
    }
}

impl<F: FileSystem + Clone> TestDatabase<F> {
    /// Creates a database in `dir` on `fs`.
    pub fn with_fs(fs: F, dir: PathBuf, config: Config) -> Self {
        let mut state = RevisionState::new(fs, FixedUuid(TEST_UUID), config);
        state.create(&dir).expect("Failed to create test database");
        Self {
            state,
            dir,
            _temp_dir: None,
        }
    }

    /// Returns the database directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the filesystem.
    pub fn fs(&self) -> &F {
        self.state.file_system()
    }

    /// Writes the staged roots as `revision`.
    pub fn commit(&mut self, revision: RevisionNumber) -> RevisionResult<()> {
        self.state.write(&self.dir, revision)
    }

    /// Opens the most recent revision with a fresh state on the same
    /// filesystem.
    pub fn reopen(&self) -> RevisionState<F, FixedUuid> {
        self.try_reopen().expect("Failed to reopen test database")
    }

    /// Like [`reopen`](Self::reopen), returning the error instead of
    /// panicking.
    pub fn try_reopen(&self) -> RevisionResult<RevisionState<F, FixedUuid>> {
        let mut state = RevisionState::new(
            self.fs().clone(),
            FixedUuid(Uuid::nil()),
            self.state.config().clone(),
        );
        state.open_most_recent(&self.dir)?;
        Ok(state)
    }

    /// Returns the names of the entries in the database directory, sorted.
    pub fn entries(&self) -> Vec<String> {
        let mut names = self
            .fs()
            .list_dir(&self.dir)
            .expect("Failed to list test database");
        names.sort();
        names
    }
}

impl<F: FileSystem + Clone> Deref for TestDatabase<F> {
    type Target = RevisionState<F, FixedUuid>;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl<F: FileSystem + Clone> DerefMut for TestDatabase<F> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.state
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use brass_core::{BlockNumber, Table};

    /// Creates an in-memory database with revisions `1..=count` written,
    /// each moving every table root forward.
    pub fn database_with_revisions(count: u32) -> TestDatabase<MemoryFileSystem> {
        let mut test_db = TestDatabase::memory();
        for rev in 1..=count {
            for table in Table::ALL {
                let block = rev * 10 + table.index() as u32;
                test_db.staged_mut().set_root(table, BlockNumber::new(block));
            }
            test_db.commit(RevisionNumber::new(rev)).expect("Failed to write revision");
        }
        test_db
    }
}
