//! Sorted directory listings with bounded memory.
//!
//! [`SortedFs`] decorates any [`adhoc_httpd_core::FileSystem`] so that
//! directory listings come out in increasing name order, no matter what
//! order the underlying store reports entries in, while holding at most a
//! fixed window of entries in memory per open directory.
//!
//! # Architecture
//!
//! - [`Window`] - bounded min-heap of entries keyed by name
//! - [`SortedDir`] - wraps one directory handle, refills the window in
//!   batches and defers the end-of-listing signal until it is drained
//! - [`SortedFs`] - attaches a `SortedDir` to every directory it opens
//!
//! # Accuracy
//!
//! Listings are exactly sorted whenever no entry arrives more than
//! `window_size` positions away from its sorted position. Larger
//! directories with more skew come out as runs of sorted entries. Memory
//! per directory never exceeds `window_size + min_batch_size - 1` entries.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::{FileHandle, FileSystem, OrderConfig, ReadLimit, StorePath};
//! use adhoc_httpd_files::MemFsBuilder;
//! use adhoc_httpd_order::SortedFs;
//!
//! let store = MemFsBuilder::new()
//!     .add_file("/quux", "")
//!     .add_file("/foo", "")
//!     .add_file("/bar", "")
//!     .build()
//!     .unwrap();
//!
//! let fs = SortedFs::new(store, OrderConfig::default());
//! let mut root = fs.open(&StorePath::root()).unwrap();
//!
//! let batch = root.read_entries(ReadLimit::at_most(100));
//! assert_eq!(batch.names(), vec!["bar", "foo", "quux"]);
//! assert!(batch.terminal.is_none());
//!
//! // The end of the listing is reported on the following call.
//! let batch = root.read_entries(ReadLimit::at_most(100));
//! assert!(batch.terminal.unwrap().is_end_of_stream());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod dir;
pub mod fs;
pub mod window;

pub use dir::SortedDir;
pub use fs::{SortedFs, SortedHandle};
pub use window::Window;
