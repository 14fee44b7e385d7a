//! # Brass Testkit
//!
//! Test utilities for the Brass revision manager.
//!
//! This crate provides:
//! - A fault-injecting filesystem that fails any chosen step of a commit
//! - Test database fixtures on disk and in memory
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use brass_testkit::prelude::*;
//!
//! let mut db = TestDatabase::memory();
//! db.staged_mut().set_root(Table::Record, BlockNumber::new(5));
//! db.commit(RevisionNumber::new(1)).unwrap();
//!
//! let reopened = db.reopen();
//! assert_eq!(reopened.root(Table::Record), BlockNumber::new(5));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use brass_core::{
        BlockNumber, Config, RevisionError, RevisionNumber, RevisionState, Table, TableRoots,
    };
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
