//! Sorting filesystem decorator.
//!
//! [`SortedFs`] wraps any [`FileSystem`] and attaches a [`SortedDir`] to
//! every directory it opens. Files pass through untouched.

use crate::dir::SortedDir;
use adhoc_httpd_core::{
    DirEntry, EntryBatch, FileHandle, FileSystem, OrderConfig, ReadLimit, Result, StorePath,
};
use std::io::{self, Read, Seek, SeekFrom};

/// A [`FileSystem`] whose directory listings come out sorted by name.
///
/// # Examples
///
/// ```
/// use adhoc_httpd_core::{FileHandle, FileSystem, OrderConfig, ReadLimit, StorePath};
/// use adhoc_httpd_files::MemFs;
/// use adhoc_httpd_order::SortedFs;
///
/// let mut mem = MemFs::new();
/// for name in ["pear", "apple", "fig"] {
///     mem.add_file(format!("/fruit/{name}"), name).unwrap();
/// }
///
/// let fs = SortedFs::new(mem, OrderConfig::default());
/// let mut dir = fs.open(&StorePath::new("/fruit").unwrap()).unwrap();
///
/// let batch = dir.read_entries(ReadLimit::All);
/// assert_eq!(batch.names(), vec!["apple", "fig", "pear"]);
/// ```
#[derive(Debug, Clone)]
pub struct SortedFs<S> {
    inner: S,
    config: OrderConfig,
}

impl<S: FileSystem> SortedFs<S> {
    /// Wraps `inner`, reordering directory listings with `config`.
    ///
    /// Zero sizes in `config` are raised to one.
    #[must_use]
    pub const fn new(inner: S, config: OrderConfig) -> Self {
        Self {
            inner,
            config: config.normalized(),
        }
    }

    /// The ordering configuration.
    #[must_use]
    pub const fn config(&self) -> &OrderConfig {
        &self.config
    }

    /// Borrows the wrapped filesystem.
    #[must_use]
    pub const fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwraps the filesystem.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: FileSystem> FileSystem for SortedFs<S> {
    type Handle = SortedHandle<S::Handle>;

    fn open(&self, path: &StorePath) -> Result<Self::Handle> {
        let handle = self.inner.open(path)?;
        if handle.stat()?.is_dir() {
            tracing::trace!(%path, window = self.config.window_size, "opened sorted directory");
            Ok(SortedHandle::Dir(SortedDir::new(handle, self.config)))
        } else {
            Ok(SortedHandle::Plain(handle))
        }
    }
}

/// Handle returned by [`SortedFs::open`].
#[derive(Debug)]
pub enum SortedHandle<H> {
    /// A directory, listed through the reordering window.
    Dir(SortedDir<H>),
    /// Anything else, passed through unchanged.
    Plain(H),
}

impl<H: FileHandle> SortedHandle<H> {
    /// Returns `true` if this handle reorders a directory listing.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Dir(_))
    }

    /// Borrows the underlying store handle.
    #[must_use]
    pub const fn get_ref(&self) -> &H {
        match self {
            Self::Dir(dir) => dir.get_ref(),
            Self::Plain(handle) => handle,
        }
    }

    /// Unwraps the underlying store handle.
    #[must_use]
    pub fn into_inner(self) -> H {
        match self {
            Self::Dir(dir) => dir.into_inner(),
            Self::Plain(handle) => handle,
        }
    }
}

impl<H: FileHandle> Read for SortedHandle<H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Dir(dir) => dir.read(buf),
            Self::Plain(handle) => handle.read(buf),
        }
    }
}

impl<H: FileHandle> Seek for SortedHandle<H> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Dir(dir) => dir.seek(pos),
            Self::Plain(handle) => handle.seek(pos),
        }
    }
}

impl<H: FileHandle> FileHandle for SortedHandle<H> {
    fn stat(&self) -> Result<DirEntry> {
        self.get_ref().stat()
    }

    fn read_entries(&mut self, limit: ReadLimit) -> EntryBatch {
        match self {
            Self::Dir(dir) => dir.read_entries(limit),
            Self::Plain(handle) => handle.read_entries(limit),
        }
    }
}
