//! Directory entry metadata and the bounded-read contract.
//!
//! Directory handles are read in bounded chunks. Each read returns an
//! [`EntryBatch`]: zero or more entries plus an optional [`Terminal`]
//! condition saying no more entries will follow.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::{DirEntry, EntryBatch, ReadLimit, Terminal};
//!
//! let batch = EntryBatch::new(vec![DirEntry::file("a.txt", 3)]);
//! assert_eq!(batch.names(), vec!["a.txt"]);
//! assert!(batch.terminal.is_none());
//!
//! assert_eq!(ReadLimit::from_count(-1), ReadLimit::All);
//! assert!(EntryBatch::end_of_stream().terminal.unwrap().is_end_of_stream());
//! ```

use crate::error::FsError;
use std::num::NonZeroUsize;
use std::time::SystemTime;

/// Metadata for one entry of a directory.
///
/// The name is the sole sort key used by the ordering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    size: u64,
    mode: u32,
    modified: Option<SystemTime>,
    is_dir: bool,
}

impl DirEntry {
    /// Creates an entry with zero size, no mode bits and no modification time.
    #[must_use]
    pub fn new(name: impl Into<String>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            size: 0,
            mode: 0,
            modified: None,
            is_dir,
        }
    }

    /// Creates a regular file entry of the given size.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::DirEntry;
    ///
    /// let entry = DirEntry::file("notes.txt", 42);
    /// assert_eq!(entry.size(), 42);
    /// assert!(!entry.is_dir());
    /// ```
    #[must_use]
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self::new(name, false).with_size(size)
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Sets the size in bytes.
    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Sets the permission/mode bits.
    #[must_use]
    pub const fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the modification time.
    #[must_use]
    pub const fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Entry name, without any directory components.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Permission/mode bits.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Modification time, if the store reports one.
    #[must_use]
    pub const fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Whether the entry is a directory.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// How many entries a single directory read may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadLimit {
    /// Return every remaining entry in one call.
    All,
    /// Return at most this many entries.
    AtMost(NonZeroUsize),
}

impl ReadLimit {
    /// Maps the signed count convention onto a limit: any count `<= 0`
    /// means "all remaining entries".
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::ReadLimit;
    ///
    /// assert_eq!(ReadLimit::from_count(0), ReadLimit::All);
    /// assert_eq!(ReadLimit::from_count(5).goal(), Some(5));
    /// ```
    #[must_use]
    pub fn from_count(count: i64) -> Self {
        usize::try_from(count)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Self::All, Self::AtMost)
    }

    /// Limit of at most `n` entries; `0` means all.
    #[must_use]
    pub fn at_most(n: usize) -> Self {
        NonZeroUsize::new(n).map_or(Self::All, Self::AtMost)
    }

    /// The entry goal, or `None` for [`ReadLimit::All`].
    #[must_use]
    pub const fn goal(self) -> Option<usize> {
        match self {
            Self::All => None,
            Self::AtMost(n) => Some(n.get()),
        }
    }

    /// Returns `true` once `produced` entries satisfy this limit.
    #[must_use]
    pub const fn is_met(self, produced: usize) -> bool {
        match self {
            Self::All => false,
            Self::AtMost(n) => produced >= n.get(),
        }
    }
}

/// Why a directory handle has no more entries to give.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// Normal end of the listing.
    EndOfStream,
    /// The store failed; the error is passed through untouched.
    Failed(FsError),
}

impl Terminal {
    /// Returns `true` for a normal end of listing.
    #[must_use]
    pub const fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }

    /// The underlying error, if the listing ended with one.
    #[must_use]
    pub const fn error(&self) -> Option<&FsError> {
        match self {
            Self::EndOfStream => None,
            Self::Failed(err) => Some(err),
        }
    }
}

impl From<FsError> for Terminal {
    fn from(err: FsError) -> Self {
        Self::Failed(err)
    }
}

/// Result of one bounded directory read.
///
/// Stores may return entries together with a terminal condition. The
/// ordering layer never does: it hands back entries first and the terminal
/// on a later call with no entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryBatch {
    /// Entries produced by this read.
    pub entries: Vec<DirEntry>,
    /// Set when the handle has nothing more to give.
    pub terminal: Option<Terminal>,
}

impl EntryBatch {
    /// A batch of entries with more to come.
    #[must_use]
    pub const fn new(entries: Vec<DirEntry>) -> Self {
        Self {
            entries,
            terminal: None,
        }
    }

    /// A batch of entries followed by a terminal condition.
    #[must_use]
    pub const fn with_terminal(entries: Vec<DirEntry>, terminal: Terminal) -> Self {
        Self {
            entries,
            terminal: Some(terminal),
        }
    }

    /// An empty batch signalling end of stream.
    #[must_use]
    pub const fn end_of_stream() -> Self {
        Self::with_terminal(Vec::new(), Terminal::EndOfStream)
    }

    /// An empty batch signalling failure.
    #[must_use]
    pub const fn failed(err: FsError) -> Self {
        Self::with_terminal(Vec::new(), Terminal::Failed(err))
    }

    /// Returns `true` if a terminal condition is attached.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Entry names, in batch order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(DirEntry::name).collect()
    }
}
