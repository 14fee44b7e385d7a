//! Core type definitions for Brass.

use std::fmt;

/// Number of a committed revision.
///
/// Revisions never go backwards. The number is stored in the revision file's
/// name as eight lowercase hex digits, which bounds it to 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RevisionNumber(pub u32);

impl RevisionNumber {
    /// Revision of a freshly created database.
    pub const ZERO: RevisionNumber = RevisionNumber(0);

    /// Creates a revision number.
    #[must_use]
    pub const fn new(rev: u32) -> Self {
        Self(rev)
    }

    /// Returns the raw revision value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Returns the next revision, or `None` once the 32-bit space is used up.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Returns the canonical file name for this revision, e.g. `v0000002a`.
    #[must_use]
    pub fn file_name(self) -> String {
        format!("v{:08x}", self.0)
    }
}

impl fmt::Display for RevisionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rev:{}", self.0)
    }
}
