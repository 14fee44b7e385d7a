//! # Brass Codec
//!
//! Byte layout of Brass revision files. This crate performs no I/O.
//!
//! A revision file is a fixed 32-byte header followed by one packed root
//! pointer per table:
//!
//! ```text
//! ┌──────────────┬────────────┬────────────┬──────────────────────────┐
//! │ Magic (14)   │ Version(2) │ UUID (16)  │ Roots (packed, variable) │
//! └──────────────┴────────────┴────────────┴──────────────────────────┘
//! ```
//!
//! Roots are written up to the highest-numbered table that has one; tables
//! past the end of the stream decode as empty.
//!
//! ## Usage
//!
//! ```
//! use brass_codec::{BlockNumber, RevisionRecord, Table, TableRoots};
//! use uuid::Uuid;
//!
//! let mut roots = TableRoots::empty();
//! roots.set(Table::Termlist, BlockNumber::new(42));
//!
//! let record = RevisionRecord::new(Uuid::from_bytes([7; 16]), roots);
//! let bytes = record.encode();
//! assert_eq!(RevisionRecord::decode(&bytes).unwrap(), record);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod pack;
mod revision;
mod types;
mod version;

pub use error::{CodecError, CodecResult};
pub use pack::{pack_uint, unpack_uint};
pub use revision::{RevisionRecord, HEADER_SIZE, NO_ROOT, REVISION_MAGIC};
pub use types::{BlockNumber, Table, TableRoots, MAX_TABLES};
pub use version::{FormatVersion, BASE_YEAR};
