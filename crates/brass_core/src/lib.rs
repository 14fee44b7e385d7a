//! # Brass Core
//!
//! Revision and commit management for the Brass index backend.
//!
//! A Brass database is a directory of tables. Each table is a tree whose
//! root block changes as the table is modified. This crate records which
//! root belongs to which table in immutable, numbered **revision files**:
//!
//! ```text
//! <db_path>/
//! ├─ v00000000      # revision 0 (written by create)
//! ├─ v00000001      # revision 1
//! ├─ v00000002      # most recent revision
//! └─ v.tmp          # staging file, only present mid-commit or after a crash
//! ```
//!
//! The newest revision is found by scanning the directory; there is no
//! pointer file. A commit writes `v.tmp`, syncs it and renames it into place,
//! so readers see either the previous revision or the new one, never a
//! partial file.
//!
//! This crate provides:
//! - [`RevisionState`] - open, read, create and commit revisions
//! - [`scan`] - revision filename parsing and directory scanning
//! - [`verify_lineage`] - integrity check across every revision file
//!
//! Only one writer may advance a database at a time; coordinating writers
//! is the caller's job. Readers need no coordination.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod commit;
mod config;
mod error;
mod revision;
pub mod scan;
mod state;
mod types;
mod uuid_source;
mod verify;

pub use brass_codec::{BlockNumber, FormatVersion, Table, TableRoots, MAX_TABLES};
pub use brass_storage::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use config::Config;
pub use error::{RevisionError, RevisionResult};
pub use revision::RevisionState;
pub use scan::{RevisionFile, TEMP_FILE_NAME};
pub use state::{CommittedState, StagedState};
pub use types::RevisionNumber;
pub use uuid_source::{FixedUuid, RandomUuid, UuidSource};
pub use verify::{verify_lineage, CheckOutcome, LineageReport, RevisionCheck};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
