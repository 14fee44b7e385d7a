//! # Brass Storage
//!
//! Filesystem primitives for the Brass revision manager.
//!
//! The revision manager never touches `std::fs` directly. Everything it needs
//! from the operating system goes through the [`FileSystem`] trait, which keeps
//! the commit sequence testable and lets failures be injected at every step.
//!
//! ## Design Principles
//!
//! - Implementations move **opaque bytes**; they know nothing about revision
//!   files, magic signatures or table roots
//! - Every operation is fallible and reports a plain [`std::io::Error`], so
//!   the OS error code survives up to the caller
//! - Implementations must be `Send + Sync`; readers may share one instance
//!
//! ## Available Filesystems
//!
//! - [`OsFileSystem`] - The real filesystem via `std::fs`
//! - [`MemoryFileSystem`] - In-memory directory tree for tests
//!
//! ## Example
//!
//! ```rust
//! use brass_storage::{FileSystem, MemoryFileSystem, WriteHandle};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.create_dir_all(Path::new("/db")).unwrap();
//!
//! let mut file = fs.create_truncate(Path::new("/db/v.tmp")).unwrap();
//! file.write_all(b"hello").unwrap();
//! file.sync_data().unwrap();
//! file.finish().unwrap();
//!
//! fs.rename(Path::new("/db/v.tmp"), Path::new("/db/v00000000")).unwrap();
//! assert_eq!(fs.list_dir(Path::new("/db")).unwrap(), vec!["v00000000"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod file;
mod memory;

pub use backend::{FileSystem, WriteHandle};
pub use file::{OsFileSystem, OsWriter};
pub use memory::{MemoryFileSystem, MemoryWriter};
