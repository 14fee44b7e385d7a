//! Committed and staged table roots.

use crate::types::RevisionNumber;
use brass_codec::{BlockNumber, Table, TableRoots};

/// An immutable snapshot of a published revision.
///
/// Obtained by reading a revision file or by a successful commit. There is
/// no way to modify one in place; the table layer reads its roots from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedState {
    revision: RevisionNumber,
    roots: TableRoots,
}

impl CommittedState {
    /// State of a database with no revision files.
    pub(crate) const fn empty() -> Self {
        Self {
            revision: RevisionNumber::ZERO,
            roots: TableRoots::empty(),
        }
    }

    pub(crate) const fn loaded(revision: RevisionNumber, roots: TableRoots) -> Self {
        Self { revision, roots }
    }

    /// Returns the revision number.
    #[must_use]
    pub const fn revision(&self) -> RevisionNumber {
        self.revision
    }

    /// Returns every table root.
    #[must_use]
    pub const fn roots(&self) -> &TableRoots {
        &self.roots
    }

    /// Returns the root of `table`, `None` if the table is empty.
    #[must_use]
    pub const fn root(&self, table: Table) -> Option<BlockNumber> {
        self.roots.get(table)
    }
}

/// Table roots proposed for the next revision.
///
/// Freely mutable. The roots only become visible to readers once a commit
/// publishes them, which turns them into a [`CommittedState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StagedState {
    roots: TableRoots,
}

impl StagedState {
    /// Staged roots with every table empty.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            roots: TableRoots::empty(),
        }
    }

    /// Stages the roots of an existing revision, ready to be modified.
    #[must_use]
    pub const fn from_committed(committed: &CommittedState) -> Self {
        Self {
            roots: committed.roots,
        }
    }

    /// Returns the staged root of `table`.
    #[must_use]
    pub const fn root(&self, table: Table) -> Option<BlockNumber> {
        self.roots.get(table)
    }

    /// Returns every staged root.
    #[must_use]
    pub const fn roots(&self) -> &TableRoots {
        &self.roots
    }

    /// Stages a new root for `table`; `None` marks the table empty.
    pub fn set_root(&mut self, table: Table, root: Option<BlockNumber>) {
        self.roots.set(table, root);
    }

    /// Marks every table empty.
    pub fn clear(&mut self) {
        self.roots = TableRoots::empty();
    }

    /// Turns the staged roots into the committed state of `revision`.
    ///
    /// Only called once the revision file is durably published.
    pub(crate) const fn commit(&self, revision: RevisionNumber) -> CommittedState {
        CommittedState {
            revision,
            roots: self.roots,
        }
    }
}
