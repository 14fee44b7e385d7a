//! The revision state of one database.

use crate::commit::CommitWriter;
use crate::config::Config;
use crate::error::{RevisionError, RevisionResult};
use crate::scan::{parse_revision_name, scan_most_recent};
use crate::state::{CommittedState, StagedState};
use crate::types::RevisionNumber;
use crate::uuid_source::{RandomUuid, UuidSource};
use brass_codec::{BlockNumber, RevisionRecord, Table};
use brass_storage::{FileSystem, OsFileSystem};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Tracks the committed revision of a database and the roots staged for the
/// next one.
///
/// # Lifecycle
///
/// 1. [`create`](Self::create) a new database, or
///    [`open_most_recent`](Self::open_most_recent) an existing one
/// 2. Stage new table roots through [`staged_mut`](Self::staged_mut)
/// 3. [`write`](Self::write) them as a new revision
///
/// Failed operations leave the in-memory state untouched.
///
/// # Example
///
/// ```rust
/// use brass_core::{BlockNumber, Config, RevisionNumber, RevisionState, Table};
///
/// let dir = tempfile::tempdir().unwrap();
///
/// let mut db = RevisionState::os(Config::default());
/// db.create(dir.path()).unwrap();
/// db.staged_mut().set_root(Table::Termlist, BlockNumber::new(42));
/// db.write(dir.path(), RevisionNumber::new(1)).unwrap();
///
/// let mut reader = RevisionState::os(Config::default());
/// reader.open_most_recent(dir.path()).unwrap();
/// assert_eq!(reader.revision(), RevisionNumber::new(1));
/// assert_eq!(reader.root(Table::Termlist), BlockNumber::new(42));
/// ```
#[derive(Debug)]
pub struct RevisionState<F: FileSystem = OsFileSystem, U: UuidSource = RandomUuid> {
    fs: F,
    uuid_source: U,
    config: Config,
    uuid: Option<Uuid>,
    committed: CommittedState,
    staged: StagedState,
}

impl RevisionState<OsFileSystem, RandomUuid> {
    /// Creates an empty state on the real filesystem with random UUIDs.
    #[must_use]
    pub fn os(config: Config) -> Self {
        Self::new(OsFileSystem::new(), RandomUuid, config)
    }
}

impl<F: FileSystem, U: UuidSource> RevisionState<F, U> {
    /// Creates an empty state: revision 0, no roots, no UUID.
    #[must_use]
    pub fn new(fs: F, uuid_source: U, config: Config) -> Self {
        Self {
            fs,
            uuid_source,
            config,
            uuid: None,
            committed: CommittedState::empty(),
            staged: StagedState::new(),
        }
    }

    /// Initialises a new database in `dir` and writes revision 0.
    ///
    /// A fresh UUID is generated and every table starts empty. Only valid on
    /// a state that has not created or read a database yet.
    ///
    /// # Errors
    ///
    /// - [`RevisionError::InvalidOperation`] if this state already holds a
    ///   database; nothing is written
    /// - [`RevisionError::Opening`] if the directory cannot be created or the
    ///   revision file cannot be written
    pub fn create(&mut self, dir: &Path) -> RevisionResult<()> {
        if let Some(existing) = self.uuid {
            return Err(RevisionError::invalid_operation(format!(
                "database {existing} is already open at revision {}",
                self.committed.revision().as_u32()
            )));
        }

        if self.config.create_if_missing {
            self.fs.create_dir_all(dir).map_err(|e| {
                RevisionError::opening(
                    format!("Couldn't create directory: {}", dir.display()),
                    e,
                )
            })?;
        }

        let uuid = self.uuid_source.generate();
        let staged = StagedState::new();
        let committed = CommitWriter::new(&self.fs, &self.config).commit(
            dir,
            RevisionNumber::ZERO,
            RevisionNumber::ZERO,
            uuid,
            &staged,
        )?;

        info!(dir = %dir.display(), %uuid, "created database");
        self.uuid = Some(uuid);
        self.committed = committed;
        self.staged = staged;
        Ok(())
    }

    /// Loads the newest revision in `dir`.
    ///
    /// A directory without revision files is an empty database: revision 0,
    /// no roots and no UUID. Call [`create`](Self::create) before writing to
    /// it.
    ///
    /// # Errors
    ///
    /// - [`RevisionError::Opening`] if the directory or file cannot be read
    /// - [`RevisionError::Corrupt`] or [`RevisionError::Version`] if the
    ///   newest file cannot be decoded
    pub fn open_most_recent(&mut self, dir: &Path) -> RevisionResult<()> {
        match scan_most_recent(&self.fs, dir)? {
            Some(file) => self.read(&file.path),
            None => {
                self.uuid = None;
                self.committed = CommittedState::empty();
                self.staged = StagedState::new();
                Ok(())
            }
        }
    }

    /// Loads the revision file at `path`.
    ///
    /// The revision number comes from the file name; a file with a
    /// non-canonical name keeps the current revision number. The staged roots
    /// are reset to the loaded ones.
    ///
    /// # Errors
    ///
    /// - [`RevisionError::Opening`] if the file cannot be opened or read
    /// - [`RevisionError::Corrupt`] if it is truncated or malformed
    /// - [`RevisionError::Version`] if it has a different format version
    pub fn read(&mut self, path: &Path) -> RevisionResult<()> {
        let record = load_record(&self.fs, path, &self.config)?;
        let revision = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_revision_name)
            .unwrap_or(self.committed.revision());

        debug!(path = %path.display(), revision = revision.as_u32(), "read revision file");
        self.uuid = Some(record.uuid);
        self.committed = CommittedState::loaded(revision, record.roots);
        self.staged = StagedState::from_committed(&self.committed);
        Ok(())
    }

    /// Publishes the staged roots as `new_revision` in `dir`.
    ///
    /// On success they become the committed state.
    ///
    /// # Errors
    ///
    /// - [`RevisionError::InvalidOperation`] if `new_revision` is older than
    ///   the current revision, or the database has no UUID yet
    /// - [`RevisionError::Opening`] if the file cannot be written and
    ///   published
    pub fn write(&mut self, dir: &Path, new_revision: RevisionNumber) -> RevisionResult<()> {
        let uuid = self.uuid.ok_or_else(|| {
            RevisionError::invalid_operation("database has no UUID; create it before writing")
        })?;

        self.committed = CommitWriter::new(&self.fs, &self.config).commit(
            dir,
            self.committed.revision(),
            new_revision,
            uuid,
            &self.staged,
        )?;
        Ok(())
    }

    /// Returns the database UUID, `None` until created or read.
    #[must_use]
    pub const fn uuid(&self) -> Option<Uuid> {
        self.uuid
    }

    /// Returns the current committed revision.
    #[must_use]
    pub const fn revision(&self) -> RevisionNumber {
        self.committed.revision()
    }

    /// Returns the committed root of `table`.
    #[must_use]
    pub const fn root(&self, table: Table) -> Option<BlockNumber> {
        self.committed.root(table)
    }

    /// Returns the committed state.
    #[must_use]
    pub const fn committed(&self) -> &CommittedState {
        &self.committed
    }

    /// Returns a copy of the committed state, for handing to readers.
    #[must_use]
    pub const fn snapshot(&self) -> CommittedState {
        self.committed
    }

    /// Returns the roots staged for the next revision.
    #[must_use]
    pub const fn staged(&self) -> &StagedState {
        &self.staged
    }

    /// Returns the roots staged for the next revision, for modification.
    pub fn staged_mut(&mut self) -> &mut StagedState {
        &mut self.staged
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the filesystem.
    #[must_use]
    pub const fn file_system(&self) -> &F {
        &self.fs
    }
}

/// Reads and decodes one revision file.
pub(crate) fn load_record<F: FileSystem>(
    fs: &F,
    path: &Path,
    config: &Config,
) -> RevisionResult<RevisionRecord> {
    let data = fs.read_prefix(path, config.max_read()).map_err(|e| {
        RevisionError::opening(
            format!(
                "{}: Failed to open brass revision file for reading",
                path.display()
            ),
            e,
        )
    })?;
    RevisionRecord::decode(&data).map_err(|e| RevisionError::from_codec(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uuid_source::FixedUuid;
    use brass_codec::{FormatVersion, HEADER_SIZE, TableRoots};
    use brass_storage::MemoryFileSystem;
    use std::path::PathBuf;
    use tempfile::tempdir;

    const DB_UUID: Uuid = Uuid::from_u128(0x0123_4567_89ab_cdef_0011_2233_4455_6677);

    fn memory_state() -> (MemoryFileSystem, RevisionState<MemoryFileSystem, FixedUuid>) {
        let fs = MemoryFileSystem::new();
        let state = RevisionState::new(fs.clone(), FixedUuid(DB_UUID), Config::default());
        (fs, state)
    }

    fn db() -> PathBuf {
        PathBuf::from("/db")
    }

    #[test]
    fn create_writes_bare_header_at_revision_zero() {
        let (fs, mut state) = memory_state();
        state.create(&db()).unwrap();

        assert_eq!(state.revision(), RevisionNumber::ZERO);
        assert_eq!(state.uuid(), Some(DB_UUID));
        assert!(state.committed().roots().is_empty());

        let bytes = fs.file("/db/v00000000").unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[16..32], DB_UUID.as_bytes());
    }

    #[test]
    fn create_without_directory_fails_when_not_allowed() {
        let fs = MemoryFileSystem::new();
        let config = Config::new().create_if_missing(false);
        let mut state = RevisionState::new(fs, FixedUuid(DB_UUID), config);

        let err = state.create(&db()).unwrap_err();
        assert!(matches!(err, RevisionError::Opening { .. }));
        assert_eq!(state.uuid(), None);
    }

    #[test]
    fn create_after_open_keeps_published_revisions() {
        let (fs, mut writer) = memory_state();
        writer.create(&db()).unwrap();
        writer.staged_mut().set_root(Table::Record, BlockNumber::new(9));
        writer.write(&db(), RevisionNumber::new(5)).unwrap();
        let published = fs.file("/db/v00000005").unwrap();

        let other = Uuid::from_u128(2);
        let mut state = RevisionState::new(fs.clone(), FixedUuid(other), Config::default());
        state.open_most_recent(&db()).unwrap();

        let err = state.create(&db()).unwrap_err();
        assert!(matches!(err, RevisionError::InvalidOperation { .. }));
        assert_eq!(state.uuid(), Some(DB_UUID));
        assert_eq!(state.revision(), RevisionNumber::new(5));
        assert_eq!(fs.file("/db/v00000005").unwrap(), published);

        let mut reader = RevisionState::new(fs, FixedUuid(other), Config::default());
        reader.open_most_recent(&db()).unwrap();
        assert_eq!(reader.uuid(), Some(DB_UUID));
        assert_eq!(reader.root(Table::Record), BlockNumber::new(9));
    }

    #[test]
    fn create_twice_rejected() {
        let (fs, mut state) = memory_state();
        state.create(&db()).unwrap();
        state.write(&db(), RevisionNumber::new(1)).unwrap();

        assert!(state.create(&db()).is_err());
        assert_eq!(state.revision(), RevisionNumber::new(1));
        assert_eq!(fs.list_dir(&db()).unwrap().len(), 2);
    }

    #[test]
    fn end_to_end_scenario() {
        let (fs, mut writer) = memory_state();
        writer.create(&db()).unwrap();

        writer.staged_mut().set_root(Table::Termlist, BlockNumber::new(42));
        writer.write(&db(), RevisionNumber::new(1)).unwrap();

        let bytes = fs.file("/db/v00000001").unwrap();
        let mut expected_roots = Vec::new();
        brass_codec::pack_uint(&mut expected_roots, u64::from(u32::MAX));
        brass_codec::pack_uint(&mut expected_roots, u64::from(u32::MAX));
        brass_codec::pack_uint(&mut expected_roots, 42);
        assert_eq!(&bytes[HEADER_SIZE..], expected_roots.as_slice());

        let mut reader = RevisionState::new(fs, FixedUuid(Uuid::nil()), Config::default());
        reader.open_most_recent(&db()).unwrap();
        assert_eq!(reader.revision(), RevisionNumber::new(1));
        assert_eq!(reader.uuid(), Some(DB_UUID));
        assert_eq!(reader.root(Table::Termlist), BlockNumber::new(42));
        assert_eq!(reader.root(Table::Postlist), None);
        assert_eq!(reader.root(Table::Record), None);
        assert_eq!(reader.root(Table::Synonym), None);
    }

    #[test]
    fn staged_roots_invisible_until_written() {
        let (_fs, mut state) = memory_state();
        state.create(&db()).unwrap();

        state.staged_mut().set_root(Table::Postlist, BlockNumber::new(3));
        assert_eq!(state.root(Table::Postlist), None);
        assert_eq!(state.staged().root(Table::Postlist), BlockNumber::new(3));

        let before = state.snapshot();
        state.write(&db(), RevisionNumber::new(1)).unwrap();
        assert_eq!(state.root(Table::Postlist), BlockNumber::new(3));
        assert_eq!(before.root(Table::Postlist), None);
    }

    #[test]
    fn lower_revision_rejected_and_nothing_written() {
        let (fs, mut state) = memory_state();
        state.create(&db()).unwrap();
        state.write(&db(), RevisionNumber::new(5)).unwrap();
        let before = fs.list_dir(&db()).unwrap();

        let err = state.write(&db(), RevisionNumber::new(2)).unwrap_err();
        assert!(matches!(err, RevisionError::InvalidOperation { .. }));
        assert_eq!(state.revision(), RevisionNumber::new(5));
        assert_eq!(fs.list_dir(&db()).unwrap(), before);
        assert!(!fs.exists("/db/v00000002"));
    }

    #[test]
    fn write_before_create_rejected() {
        let (_fs, mut state) = memory_state();
        let err = state.write(&db(), RevisionNumber::new(1)).unwrap_err();
        assert!(matches!(err, RevisionError::InvalidOperation { .. }));
    }

    #[test]
    fn open_empty_directory() {
        let (fs, mut state) = memory_state();
        fs.create_dir_all(&db()).unwrap();

        state.open_most_recent(&db()).unwrap();
        assert_eq!(state.revision(), RevisionNumber::ZERO);
        assert_eq!(state.uuid(), None);
        assert!(state.committed().roots().is_empty());
    }

    #[test]
    fn open_resets_staged_to_committed() {
        let (fs, mut writer) = memory_state();
        writer.create(&db()).unwrap();
        writer.staged_mut().set_root(Table::Value, BlockNumber::new(11));
        writer.write(&db(), RevisionNumber::new(1)).unwrap();

        let mut reopened = RevisionState::new(fs, FixedUuid(DB_UUID), Config::default());
        reopened.open_most_recent(&db()).unwrap();
        assert_eq!(reopened.staged().roots(), reopened.committed().roots());

        reopened.staged_mut().set_root(Table::Spelling, BlockNumber::new(12));
        reopened.write(&db(), RevisionNumber::new(2)).unwrap();
        assert_eq!(reopened.root(Table::Value), BlockNumber::new(11));
        assert_eq!(reopened.root(Table::Spelling), BlockNumber::new(12));
    }

    #[test]
    fn read_truncated_file_is_corrupt() {
        let (fs, mut state) = memory_state();
        fs.insert_file("/db/v00000003", vec![0x0f; 20]);

        let err = state.read(Path::new("/db/v00000003")).unwrap_err();
        assert!(err.is_corruption());
        assert_eq!(state.revision(), RevisionNumber::ZERO);
    }

    #[test]
    fn read_reports_version_mismatch() {
        let (fs, mut state) = memory_state();
        let mut bytes = RevisionRecord::new(DB_UUID, TableRoots::empty())
            .encode()
            .to_vec();
        let future = FormatVersion::from_date(2030, 7, 14);
        bytes[14..16].copy_from_slice(&future.as_u16().to_be_bytes());
        fs.insert_file("/db/v00000001", bytes);

        match state.open_most_recent(&db()).unwrap_err() {
            RevisionError::Version {
                found, expected, ..
            } => {
                assert_eq!(found.to_string(), "20300714");
                assert_eq!(expected, FormatVersion::CURRENT);
                assert_ne!(found, expected);
            }
            other => panic!("expected version error, got {other:?}"),
        }
    }

    #[test]
    fn read_rejects_trailing_junk() {
        let (fs, mut state) = memory_state();
        let mut roots = TableRoots::empty();
        roots.set(Table::Synonym, BlockNumber::new(1));
        let mut bytes = RevisionRecord::new(DB_UUID, roots).encode().to_vec();
        bytes.push(0x01);
        fs.insert_file("/db/v00000001", bytes);

        let err = state.open_most_recent(&db()).unwrap_err();
        assert!(err.is_corruption());
        assert!(err.to_string().contains("junk at end"));
    }

    #[test]
    fn read_missing_file_is_opening_error() {
        let (_fs, mut state) = memory_state();
        let err = state.read(Path::new("/db/v00000009")).unwrap_err();
        assert!(matches!(err, RevisionError::Opening { .. }));
        assert!(err.to_string().contains("Failed to open brass revision file"));
    }

    #[test]
    fn oversized_file_is_corrupt() {
        let (fs, mut state) = memory_state();
        let mut bytes = RevisionRecord::new(DB_UUID, TableRoots::empty())
            .encode()
            .to_vec();
        bytes.resize(1024, 0);
        fs.insert_file("/db/v00000001", bytes);

        assert!(state.open_most_recent(&db()).unwrap_err().is_corruption());
    }

    #[test]
    fn non_canonical_name_keeps_revision() {
        let (fs, mut state) = memory_state();
        let bytes = RevisionRecord::new(DB_UUID, TableRoots::empty())
            .encode()
            .to_vec();
        fs.insert_file("/backup/copy-of-rev", bytes);

        state.read(Path::new("/backup/copy-of-rev")).unwrap();
        assert_eq!(state.revision(), RevisionNumber::ZERO);
        assert_eq!(state.uuid(), Some(DB_UUID));
    }

    #[test]
    fn on_disk_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db");

        let mut writer =
            RevisionState::new(OsFileSystem::new(), FixedUuid(DB_UUID), Config::default());
        writer.create(&path).unwrap();
        for rev in 1..=5u32 {
            writer.staged_mut().set_root(Table::Postlist, BlockNumber::new(rev * 100));
            writer.write(&path, RevisionNumber::new(rev)).unwrap();
        }
        assert!(!path.join("v.tmp").exists());

        let mut reader = RevisionState::os(Config::default());
        reader.open_most_recent(&path).unwrap();
        assert_eq!(reader.revision(), RevisionNumber::new(5));
        assert_eq!(reader.uuid(), Some(DB_UUID));
        assert_eq!(reader.root(Table::Postlist), BlockNumber::new(500));
    }
}
