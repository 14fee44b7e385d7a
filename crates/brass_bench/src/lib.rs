//! Benchmark utilities.

use brass_codec::{BlockNumber, Table, TableRoots};

/// Roots for the first `tables` tables, with blocks of roughly `magnitude`.
///
/// Larger blocks take more bytes to encode.
pub fn roots(tables: usize, magnitude: u32) -> TableRoots {
    let mut roots = TableRoots::empty();
    for table in Table::ALL.into_iter().take(tables) {
        let block = magnitude.saturating_add(table.index() as u32);
        roots.set(table, BlockNumber::new(block.min(BlockNumber::MAX.as_u32())));
    }
    roots
}
