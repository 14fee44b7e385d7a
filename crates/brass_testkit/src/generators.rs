//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random test data
//! that maintains required invariants.

use brass_codec::RevisionRecord;
use brass_core::{BlockNumber, RevisionNumber, Table, TableRoots, MAX_TABLES};
use proptest::prelude::*;
use uuid::Uuid;

/// Strategy for valid block numbers, biased towards the extremes.
pub fn block_number_strategy() -> impl Strategy<Value = BlockNumber> {
    prop_oneof![
        Just(0u32),
        Just(BlockNumber::MAX.as_u32()),
        0u32..128,
        0u32..=BlockNumber::MAX.as_u32(),
    ]
    .prop_filter_map("sentinel is not a block number", BlockNumber::new)
}

/// Strategy for the roots of every table, each possibly empty.
pub fn table_roots_strategy() -> impl Strategy<Value = TableRoots> {
    prop::collection::vec(prop::option::of(block_number_strategy()), MAX_TABLES).prop_map(
        |roots| {
            let mut table_roots = TableRoots::empty();
            for (table, root) in Table::ALL.into_iter().zip(roots) {
                table_roots.set(table, root);
            }
            table_roots
        },
    )
}

/// Strategy for database UUIDs.
pub fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

/// Strategy for complete revision records.
pub fn revision_record_strategy() -> impl Strategy<Value = RevisionRecord> {
    (uuid_strategy(), table_roots_strategy())
        .prop_map(|(uuid, roots)| RevisionRecord::new(uuid, roots))
}

/// Strategy for revision numbers.
pub fn revision_number_strategy() -> impl Strategy<Value = RevisionNumber> {
    any::<u32>().prop_map(RevisionNumber::new)
}

/// Strategy for a strictly increasing run of revision numbers.
pub fn revision_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<RevisionNumber>> {
    prop::collection::btree_set(1u32..10_000, 1..=max_len)
        .prop_map(|revs| revs.into_iter().map(RevisionNumber::new).collect())
}

/// Strategy for directory entry names that are not revision files.
pub fn non_revision_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("v[0-9a-f]{0,7}").expect("Invalid regex"),
        prop::string::string_regex("v[0-9a-f]{9,12}").expect("Invalid regex"),
        prop::string::string_regex("v[0-9a-f]{0,7}[A-Zg-z.][0-9a-f]{0,7}").expect("Invalid regex"),
        prop::string::string_regex("[a-uw-z][a-z0-9._]{0,12}").expect("Invalid regex"),
    ]
}
