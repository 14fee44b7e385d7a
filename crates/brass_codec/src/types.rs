//! Table identifiers and root pointers.

use crate::revision::NO_ROOT;
use std::fmt;

/// Number of tables tracked by a revision file.
pub const MAX_TABLES: usize = 7;

/// The tables making up a Brass database.
///
/// The discriminant is the table's position in the revision file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    /// Posting lists.
    Postlist = 0,
    /// Document data.
    Record = 1,
    /// Per-document term lists.
    Termlist = 2,
    /// Term positions.
    Position = 3,
    /// Document values.
    Value = 4,
    /// Spelling dictionary.
    Spelling = 5,
    /// Synonym dictionary.
    Synonym = 6,
}

impl Table {
    /// Every table, in file order.
    pub const ALL: [Table; MAX_TABLES] = [
        Table::Postlist,
        Table::Record,
        Table::Termlist,
        Table::Position,
        Table::Value,
        Table::Spelling,
        Table::Synonym,
    ];

    /// Returns the table's position in the revision file.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the table at `index`, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the table's lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Table::Postlist => "postlist",
            Table::Record => "record",
            Table::Termlist => "termlist",
            Table::Position => "position",
            Table::Value => "value",
            Table::Spelling => "spelling",
            Table::Synonym => "synonym",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A block pointer naming the root block of a table.
///
/// [`NO_ROOT`] is reserved on disk for "no root" and is never a valid
/// `BlockNumber`; absence is expressed as `Option<BlockNumber>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockNumber(u32);

impl BlockNumber {
    /// Largest representable block number.
    pub const MAX: BlockNumber = BlockNumber(NO_ROOT - 1);

    /// Creates a block number, or `None` for the reserved sentinel value.
    #[must_use]
    pub const fn new(block: u32) -> Option<Self> {
        if block == NO_ROOT {
            None
        } else {
            Some(Self(block))
        }
    }

    /// Returns the raw block number.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The root of every table, `None` where a table is empty or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TableRoots([Option<BlockNumber>; MAX_TABLES]);

impl TableRoots {
    /// Roots with every table absent.
    #[must_use]
    pub const fn empty() -> Self {
        Self([None; MAX_TABLES])
    }

    /// Returns the root of `table`.
    #[must_use]
    pub const fn get(&self, table: Table) -> Option<BlockNumber> {
        self.0[table.index()]
    }

    /// Sets the root of `table`.
    pub fn set(&mut self, table: Table, root: Option<BlockNumber>) {
        self.0[table.index()] = root;
    }

    /// Iterates over `(table, root)` pairs in file order.
    pub fn iter(&self) -> impl Iterator<Item = (Table, Option<BlockNumber>)> + '_ {
        Table::ALL.iter().map(move |&table| (table, self.get(table)))
    }

    /// Number of leading entries that must be written so every present root
    /// is recorded. Trailing absent tables are omitted.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.0
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |last| last + 1)
    }

    /// Returns whether every table is absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encoded_len() == 0
    }
}
