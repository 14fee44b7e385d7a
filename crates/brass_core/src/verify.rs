//! Integrity checking across every revision file of a database.

use crate::config::Config;
use crate::error::RevisionResult;
use crate::revision::load_record;
use crate::scan::list_revisions;
use crate::types::RevisionNumber;
use brass_codec::TableRoots;
use brass_storage::FileSystem;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of checking one revision file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The file decodes and belongs to the database lineage.
    Valid {
        /// UUID recorded in the file.
        uuid: Uuid,
        /// Table roots recorded in the file.
        roots: TableRoots,
    },
    /// The file decodes but carries a different UUID than the newest valid
    /// revision.
    UuidMismatch {
        /// UUID recorded in the file.
        found: Uuid,
    },
    /// The file could not be read or decoded.
    Failed {
        /// Description of the failure.
        error: String,
    },
}

/// One revision file and its check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionCheck {
    /// Revision number from the file name.
    pub revision: RevisionNumber,
    /// Path of the file.
    pub path: PathBuf,
    /// What the check found.
    pub outcome: CheckOutcome,
}

/// Report produced by [`verify_lineage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageReport {
    /// The database directory.
    pub directory: PathBuf,
    /// UUID of the newest valid revision, `None` if no revision is valid.
    pub uuid: Option<Uuid>,
    /// Every revision file, oldest first.
    pub revisions: Vec<RevisionCheck>,
}

impl LineageReport {
    /// Returns true if every revision file is valid.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.revisions
            .iter()
            .all(|check| matches!(check.outcome, CheckOutcome::Valid { .. }))
    }

    /// Returns the checks that did not pass.
    pub fn problems(&self) -> impl Iterator<Item = &RevisionCheck> + '_ {
        self.revisions
            .iter()
            .filter(|check| !matches!(check.outcome, CheckOutcome::Valid { .. }))
    }

    /// Returns the newest revision that passed, if any.
    #[must_use]
    pub fn latest_valid(&self) -> Option<&RevisionCheck> {
        self.revisions
            .iter()
            .rev()
            .find(|check| matches!(check.outcome, CheckOutcome::Valid { .. }))
    }
}

/// Decodes every revision file in `dir` and checks they share one UUID.
///
/// Individual file failures are reported in the [`LineageReport`], not
/// returned as errors. The reference UUID is taken from the newest file that
/// decodes.
///
/// # Errors
///
/// Returns [`crate::RevisionError::Opening`] if the directory cannot be
/// listed.
pub fn verify_lineage<F: FileSystem>(
    fs: &F,
    dir: &Path,
    config: &Config,
) -> RevisionResult<LineageReport> {
    let files = list_revisions(fs, dir)?;

    let mut revisions: Vec<RevisionCheck> = files
        .into_iter()
        .map(|file| {
            let outcome = match load_record(fs, &file.path, config) {
                Ok(record) => CheckOutcome::Valid {
                    uuid: record.uuid,
                    roots: record.roots,
                },
                Err(e) => {
                    warn!(
                        path = %file.path.display(),
                        error = %e,
                        "revision file failed verification"
                    );
                    CheckOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            RevisionCheck {
                revision: file.revision,
                path: file.path,
                outcome,
            }
        })
        .collect();

    let uuid = revisions.iter().rev().find_map(|check| match check.outcome {
        CheckOutcome::Valid { uuid, .. } => Some(uuid),
        _ => None,
    });

    if let Some(lineage) = uuid {
        for check in &mut revisions {
            if let CheckOutcome::Valid { uuid: found, .. } = check.outcome {
                if found != lineage {
                    warn!(
                        revision = check.revision.as_u32(),
                        %found,
                        expected = %lineage,
                        "revision belongs to a different database"
                    );
                    check.outcome = CheckOutcome::UuidMismatch { found };
                }
            }
        }
    }

    debug!(dir = %dir.display(), files = revisions.len(), "verified revision lineage");
    Ok(LineageReport {
        directory: dir.to_path_buf(),
        uuid,
        revisions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevisionError;
    use crate::revision::RevisionState;
    use crate::uuid_source::FixedUuid;
    use brass_codec::{BlockNumber, RevisionRecord, Table};
    use brass_storage::MemoryFileSystem;

    const LINEAGE: Uuid = Uuid::from_u128(0xaaaa);
    const STRANGER: Uuid = Uuid::from_u128(0xbbbb);

    fn database(revisions: u32) -> MemoryFileSystem {
        let fs = MemoryFileSystem::new();
        let mut state = RevisionState::new(fs.clone(), FixedUuid(LINEAGE), Config::default());
        state.create(Path::new("/db")).unwrap();
        for rev in 1..=revisions {
            state.staged_mut().set_root(Table::Record, BlockNumber::new(rev));
            state.write(Path::new("/db"), RevisionNumber::new(rev)).unwrap();
        }
        fs
    }

    #[test]
    fn healthy_database_passes() {
        let fs = database(3);
        let report = verify_lineage(&fs, Path::new("/db"), &Config::default()).unwrap();

        assert!(report.is_ok());
        assert_eq!(report.uuid, Some(LINEAGE));
        assert_eq!(report.revisions.len(), 4);
        assert_eq!(report.problems().count(), 0);

        let latest = report.latest_valid().unwrap();
        assert_eq!(latest.revision, RevisionNumber::new(3));
        match &latest.outcome {
            CheckOutcome::Valid { roots, .. } => {
                assert_eq!(roots.get(Table::Record), BlockNumber::new(3));
            }
            other => panic!("expected valid outcome, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_file_reported_not_returned() {
        let fs = database(2);
        fs.insert_file("/db/v00000001", b"\x0f\x0dXapian Brass".to_vec());

        let report = verify_lineage(&fs, Path::new("/db"), &Config::default()).unwrap();
        assert!(!report.is_ok());
        assert_eq!(report.uuid, Some(LINEAGE));

        let problems: Vec<_> = report.problems().collect();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].revision, RevisionNumber::new(1));
        assert!(matches!(problems[0].outcome, CheckOutcome::Failed { .. }));
    }

    #[test]
    fn foreign_revision_flagged() {
        let fs = database(1);
        let foreign = RevisionRecord::new(STRANGER, TableRoots::empty()).encode();
        fs.insert_file("/db/v00000000", foreign.to_vec());

        let report = verify_lineage(&fs, Path::new("/db"), &Config::default()).unwrap();
        assert_eq!(report.uuid, Some(LINEAGE));
        assert_eq!(
            report.revisions[0].outcome,
            CheckOutcome::UuidMismatch { found: STRANGER }
        );
    }

    #[test]
    fn newest_valid_file_sets_lineage() {
        let fs = database(1);
        fs.insert_file("/db/v00000002", vec![0; 4]);

        let report = verify_lineage(&fs, Path::new("/db"), &Config::default()).unwrap();
        assert_eq!(report.uuid, Some(LINEAGE));
        assert_eq!(
            report.latest_valid().map(|c| c.revision),
            Some(RevisionNumber::new(1))
        );
    }

    #[test]
    fn empty_directory_has_no_lineage() {
        let fs = MemoryFileSystem::new();
        fs.create_dir_all(Path::new("/db")).unwrap();

        let report = verify_lineage(&fs, Path::new("/db"), &Config::default()).unwrap();
        assert!(report.is_ok());
        assert_eq!(report.uuid, None);
        assert!(report.revisions.is_empty());
    }

    #[test]
    fn missing_directory_is_error() {
        let fs = MemoryFileSystem::new();
        let err = verify_lineage(&fs, Path::new("/nope"), &Config::default()).unwrap_err();
        assert!(matches!(err, RevisionError::Opening { .. }));
    }
}
