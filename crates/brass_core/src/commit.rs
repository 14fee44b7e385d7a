//! Publishing new revision files.
//!
//! A commit follows the write-then-rename pattern:
//! 1. Encode the header and staged roots
//! 2. Write them to `v.tmp`
//! 3. Sync `v.tmp` to disk and close it
//! 4. Rename `v.tmp` to the revision's canonical name
//! 5. Sync the directory so the rename is durable
//!
//! A revision file therefore only ever appears under its final name fully
//! written and synced. If any step up to the rename fails, `v.tmp` is removed
//! and nothing changes on disk.

use crate::config::Config;
use crate::error::{RevisionError, RevisionResult};
use crate::scan::{revision_path, TEMP_FILE_NAME};
use crate::state::{CommittedState, StagedState};
use crate::types::RevisionNumber;
use brass_codec::RevisionRecord;
use brass_storage::{FileSystem, WriteHandle};
use std::io;
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Writes revision files for one database directory.
///
/// Holds no state between commits. Only one writer may commit to a given
/// directory at a time.
pub(crate) struct CommitWriter<'a, F: FileSystem> {
    fs: &'a F,
    config: &'a Config,
}

impl<'a, F: FileSystem> CommitWriter<'a, F> {
    pub(crate) const fn new(fs: &'a F, config: &'a Config) -> Self {
        Self { fs, config }
    }

    /// Publishes `staged` as revision `new_revision` and returns the
    /// resulting committed state.
    ///
    /// # Errors
    ///
    /// - [`RevisionError::InvalidOperation`] if `new_revision` is older than
    ///   `current`; no I/O is performed
    /// - [`RevisionError::Opening`] if the staging file cannot be created,
    ///   written, synced, closed or renamed
    pub(crate) fn commit(
        &self,
        dir: &Path,
        current: RevisionNumber,
        new_revision: RevisionNumber,
        uuid: Uuid,
        staged: &StagedState,
    ) -> RevisionResult<CommittedState> {
        if new_revision < current {
            return Err(RevisionError::invalid_operation(format!(
                "New revision {} < old revision {}",
                new_revision.as_u32(),
                current.as_u32()
            )));
        }

        let data = RevisionRecord::new(uuid, *staged.roots()).encode();
        let tmp_path = dir.join(TEMP_FILE_NAME);
        let final_path = revision_path(dir, new_revision);

        let mut file = self.fs.create_truncate(&tmp_path).map_err(|e| {
            RevisionError::opening(
                format!("Couldn't write new rev file: {}", tmp_path.display()),
                e,
            )
        })?;

        if let Err(e) = file.write_all(&data) {
            drop(file);
            return Err(self.abandon(&tmp_path, "Couldn't write new rev file", e));
        }

        if let Err(e) = file.sync_data() {
            drop(file);
            return Err(self.abandon(&tmp_path, "Failed to sync new rev file", e));
        }

        if let Err(e) = file.finish() {
            return Err(self.abandon(&tmp_path, "Failed to close new rev file", e));
        }

        if let Err(e) = self.fs.rename(&tmp_path, &final_path) {
            return Err(self.abandon(&tmp_path, "Failed to rename new rev file", e));
        }

        if self.config.sync_directory {
            // The revision is already published; a failed sync does not undo it.
            if let Err(e) = self.fs.sync_dir(dir) {
                warn!(
                    dir = %dir.display(),
                    error = %e,
                    "failed to sync database directory after commit"
                );
            }
        }

        info!(
            revision = new_revision.as_u32(),
            bytes = data.len(),
            path = %final_path.display(),
            "committed revision"
        );
        Ok(staged.commit(new_revision))
    }

    /// Removes the staging file after a failed step and builds the error.
    fn abandon(&self, tmp_path: &Path, what: &str, source: io::Error) -> RevisionError {
        if let Err(e) = self.fs.remove_file(tmp_path) {
            warn!(
                path = %tmp_path.display(),
                error = %e,
                "failed to remove temporary revision file"
            );
        }
        RevisionError::opening(format!("{what}: {}", tmp_path.display()), source)
    }
}
