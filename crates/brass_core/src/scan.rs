//! Revision file discovery.
//!
//! Revision files are named `v` followed by exactly eight lowercase hex
//! digits. Because every candidate has the same width, the lexicographically
//! greatest name is also the numerically greatest revision. Any other entry
//! in the directory, including the `v.tmp` staging file, is ignored.

use crate::error::{RevisionError, RevisionResult};
use crate::types::RevisionNumber;
use brass_storage::FileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the staging file a commit writes before renaming it into place.
pub const TEMP_FILE_NAME: &str = "v.tmp";

/// A revision file found in a database directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionFile {
    /// Revision number parsed from the file name.
    pub revision: RevisionNumber,
    /// Full path of the file.
    pub path: PathBuf,
}

/// Parses a revision number from a file name.
///
/// Returns `None` unless `name` is `v` followed by exactly eight characters
/// from `[0-9a-f]`.
///
/// ```
/// use brass_core::scan::parse_revision_name;
///
/// assert_eq!(parse_revision_name("v0000000a").map(|r| r.as_u32()), Some(10));
/// assert_eq!(parse_revision_name("v0000000A"), None);
/// assert_eq!(parse_revision_name("v.tmp"), None);
/// ```
#[must_use]
pub fn parse_revision_name(name: &str) -> Option<RevisionNumber> {
    let digits = name.strip_prefix('v')?;
    if digits.len() != 8 || !digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(RevisionNumber::new)
}

/// Returns the path of `revision`'s file inside `dir`.
#[must_use]
pub fn revision_path(dir: &Path, revision: RevisionNumber) -> PathBuf {
    dir.join(revision.file_name())
}

/// Lists every revision file in `dir`, oldest first.
///
/// # Errors
///
/// Returns [`RevisionError::Opening`] if the directory cannot be listed.
pub fn list_revisions<F: FileSystem>(fs: &F, dir: &Path) -> RevisionResult<Vec<RevisionFile>> {
    let names = fs.list_dir(dir).map_err(|e| {
        RevisionError::opening(format!("Couldn't open directory: {}", dir.display()), e)
    })?;

    let mut files: Vec<RevisionFile> = names
        .iter()
        .filter_map(|name| {
            parse_revision_name(name).map(|revision| RevisionFile {
                revision,
                path: dir.join(name),
            })
        })
        .collect();
    files.sort_by_key(|file| file.revision);
    Ok(files)
}

/// Finds the most recent revision file in `dir`.
///
/// Returns `None` for an empty database (no revision files at all).
///
/// # Errors
///
/// Returns [`RevisionError::Opening`] if the directory cannot be listed.
pub fn scan_most_recent<F: FileSystem>(
    fs: &F,
    dir: &Path,
) -> RevisionResult<Option<RevisionFile>> {
    let newest = list_revisions(fs, dir)?.pop();
    match &newest {
        Some(file) => debug!(
            revision = file.revision.as_u32(),
            dir = %dir.display(),
            "found most recent revision"
        ),
        None => debug!(dir = %dir.display(), "no revision files, database is empty"),
    }
    Ok(newest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brass_storage::MemoryFileSystem;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn canonical_names_parse_back(rev in any::<u32>()) {
            let revision = RevisionNumber::new(rev);
            prop_assert_eq!(parse_revision_name(&revision.file_name()), Some(revision));
        }

        #[test]
        fn name_order_matches_revision_order(a in any::<u32>(), b in any::<u32>()) {
            let (ra, rb) = (RevisionNumber::new(a), RevisionNumber::new(b));
            prop_assert_eq!(ra.file_name().cmp(&rb.file_name()), ra.cmp(&rb));
        }
    }

    #[test]
    fn accepts_only_eight_lowercase_hex_digits() {
        assert_eq!(parse_revision_name("v00000000"), Some(RevisionNumber::ZERO));
        assert_eq!(parse_revision_name("vffffffff"), Some(RevisionNumber::new(u32::MAX)));

        for bad in [
            "vXXXXXXXX",
            "v1234567",
            "v123456789",
            "v0000000A",
            "V00000001",
            "v.tmp",
            "v",
            "",
            "postlist.DB",
            "x00000001",
            "v+0000001",
            "v0000000é",
        ] {
            assert_eq!(parse_revision_name(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn selects_greatest_valid_name() {
        let fs = MemoryFileSystem::new();
        for name in [
            "v00000001",
            "v0000000a",
            "vXXXXXXXX",
            "v1234567",
            "v123456789",
            "v.tmp",
            "postlist.DB",
            "iamchert",
        ] {
            fs.insert_file(Path::new("/db").join(name), Vec::new());
        }

        let newest = scan_most_recent(&fs, Path::new("/db")).unwrap().unwrap();
        assert_eq!(newest.revision, RevisionNumber::new(10));
        assert_eq!(newest.path, Path::new("/db/v0000000a"));
    }

    #[test]
    fn empty_directory_has_no_revision() {
        let fs = MemoryFileSystem::new();
        fs.create_dir_all(Path::new("/db")).unwrap();
        fs.insert_file("/db/v.tmp", vec![1, 2, 3]);

        assert_eq!(scan_most_recent(&fs, Path::new("/db")).unwrap(), None);
    }

    #[test]
    fn listing_is_sorted_oldest_first() {
        let fs = MemoryFileSystem::new();
        for name in ["v00000010", "v00000002", "v0000000f"] {
            fs.insert_file(Path::new("/db").join(name), Vec::new());
        }

        let revisions: Vec<u32> = list_revisions(&fs, Path::new("/db"))
            .unwrap()
            .iter()
            .map(|f| f.revision.as_u32())
            .collect();
        assert_eq!(revisions, vec![2, 15, 16]);
    }

    #[test]
    fn unlistable_directory_is_opening_error() {
        let fs = MemoryFileSystem::new();
        let err = scan_most_recent(&fs, Path::new("/missing")).unwrap_err();
        assert!(matches!(err, RevisionError::Opening { .. }));
        assert!(err.to_string().contains("/missing"));
    }
}
