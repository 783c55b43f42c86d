//! Sorting directory handle.
//!
//! [`SortedDir`] wraps an open directory handle and hands its entries back
//! in increasing name order, as far as a bounded [`Window`] allows.
//!
//! Each read first tops the window up from the underlying handle, then
//! repeatedly moves the smallest buffered entry to the result, topping up
//! again after every move. When the underlying handle reports end of stream
//! or an error, that terminal condition is parked until the window has been
//! drained, and only returned on a call that would otherwise produce no
//! entries.
//!
//! If no entry arrives more than `window_size` positions away from its
//! sorted position, the output is exactly sorted. Otherwise the output is a
//! sequence of sorted runs.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::{DirEntry, EntryBatch, FileHandle, OrderConfig, ReadLimit, Result};
//! use adhoc_httpd_order::SortedDir;
//! use std::io::{self, Read, Seek, SeekFrom};
//!
//! struct Listing(Option<Vec<DirEntry>>);
//!
//! impl Read for Listing {
//!     fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
//!         Ok(0)
//!     }
//! }
//!
//! impl Seek for Listing {
//!     fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
//!         Ok(0)
//!     }
//! }
//!
//! impl FileHandle for Listing {
//!     fn stat(&self) -> Result<DirEntry> {
//!         Ok(DirEntry::dir("xyzzy"))
//!     }
//!
//!     fn read_entries(&mut self, _limit: ReadLimit) -> EntryBatch {
//!         self.0.take().map_or_else(EntryBatch::end_of_stream, EntryBatch::new)
//!     }
//! }
//!
//! let names = ["quux", "foo", "bar"].map(|n| DirEntry::file(n, 42));
//! let mut dir = SortedDir::new(Listing(Some(names.to_vec())), OrderConfig::default());
//!
//! let batch = dir.read_entries(ReadLimit::at_most(100));
//! assert_eq!(batch.names(), vec!["bar", "foo", "quux"]);
//! assert!(batch.terminal.is_none());
//!
//! let batch = dir.read_entries(ReadLimit::at_most(100));
//! assert!(batch.entries.is_empty());
//! assert!(batch.terminal.unwrap().is_end_of_stream());
//! ```

use crate::window::Window;
use adhoc_httpd_core::{DirEntry, EntryBatch, FileHandle, OrderConfig, ReadLimit, Result, Terminal};
use std::io::{self, Read, Seek, SeekFrom};

/// A directory handle whose listing comes out sorted by name.
///
/// Holds at most `window_size + min_batch_size - 1` entries at any time.
/// Not meant for concurrent use: all reads take `&mut self`.
#[derive(Debug)]
pub struct SortedDir<H> {
    inner: H,
    window: Window,
    config: OrderConfig,
    /// Set once the underlying handle has nothing more to give; returned
    /// to the caller once the window is empty.
    terminal: Option<Terminal>,
}

impl<H: FileHandle> SortedDir<H> {
    /// Wraps an open directory handle.
    ///
    /// Both sizes in `config` should be non-zero (see
    /// [`OrderConfig::validate`]); a zero in either is treated as one.
    #[must_use]
    pub fn new(inner: H, config: OrderConfig) -> Self {
        let config = config.normalized();
        Self {
            inner,
            window: Window::new(config.window_size),
            config,
            terminal: None,
        }
    }

    /// Reads up to `limit` entries in name order.
    ///
    /// Returns entries with no terminal condition while any remain. The
    /// underlying handle's terminal condition is returned alone, on the first
    /// call after the window has been emptied, and again on every call after
    /// that.
    pub fn read_entries(&mut self, limit: ReadLimit) -> EntryBatch {
        if self.window.is_empty()
            && let Some(terminal) = &self.terminal
        {
            return EntryBatch::with_terminal(Vec::new(), terminal.clone());
        }

        let mut entries = Vec::new();
        loop {
            if limit.is_met(entries.len()) {
                return EntryBatch::new(entries);
            }

            self.fill();

            match self.window.pop_min() {
                Some(entry) => entries.push(entry),
                // Drained. A terminal recorded during this call waits for the next one.
                None => return EntryBatch::new(entries),
            }
        }
    }

    /// Pulls batches from the underlying handle until the window is full or
    /// the handle reports a terminal condition.
    fn fill(&mut self) {
        while self.terminal.is_none() && self.window.room() > 0 {
            let want = self.config.batch_size(self.window.len());
            let batch = self.inner.read_entries(ReadLimit::at_most(want));
            let received = batch.entries.len();

            for entry in batch.entries {
                self.window.insert(entry);
            }

            if let Some(terminal) = batch.terminal {
                match terminal.error() {
                    Some(err) => {
                        tracing::debug!(error = %err, "directory read failed, draining window");
                    }
                    None => tracing::trace!(buffered = self.window.len(), "directory exhausted"),
                }
                self.terminal = Some(terminal);
                break;
            }

            if received == 0 {
                // Nothing available right now; try again on the next pop.
                break;
            }
        }
    }

    /// Number of entries currently buffered in the window.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    /// Returns `true` once a terminal condition has been recorded.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.terminal.is_some()
    }

    /// The configuration this handle was built with.
    #[must_use]
    pub const fn config(&self) -> &OrderConfig {
        &self.config
    }

    /// Borrows the underlying handle.
    #[must_use]
    pub const fn get_ref(&self) -> &H {
        &self.inner
    }

    /// Mutably borrows the underlying handle.
    ///
    /// Reading entries directly from it bypasses the window.
    pub const fn get_mut(&mut self) -> &mut H {
        &mut self.inner
    }

    /// Unwraps the underlying handle, discarding buffered entries.
    #[must_use]
    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: FileHandle> Read for SortedDir<H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<H: FileHandle> Seek for SortedDir<H> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl<H: FileHandle> FileHandle for SortedDir<H> {
    fn stat(&self) -> Result<DirEntry> {
        self.inner.stat()
    }

    fn read_entries(&mut self, limit: ReadLimit) -> EntryBatch {
        Self::read_entries(self, limit)
    }
}
