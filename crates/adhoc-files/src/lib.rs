//! Underlying file stores for adhoc-httpd.
//!
//! Two implementations of [`adhoc_httpd_core::FileSystem`]:
//!
//! - [`LocalFs`] serves a directory on disk, listing directories in the
//!   order the operating system reports them.
//! - [`MemFs`] keeps files in memory and lists directories in hash order.
//!
//! Neither sorts its listings; that is the job of the ordering layer.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::{FileSystem, StorePath};
//! use adhoc_httpd_files::MemFsBuilder;
//!
//! let fs = MemFsBuilder::new()
//!     .add_file("/docs/readme.md", "# hi")
//!     .build()
//!     .unwrap();
//!
//! assert!(fs.open(&StorePath::new("/docs").unwrap()).is_ok());
//! assert!(fs.open(&StorePath::new("/missing").unwrap()).is_err());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod builder;
pub mod local;
pub mod mem;

pub use builder::MemFsBuilder;
pub use local::{LocalFs, LocalHandle};
pub use mem::{MemFs, MemHandle};
