//! Store and handle traits.

use crate::error::Result;
use crate::path::StorePath;
use crate::types::{DirEntry, EntryBatch, ReadLimit};
use std::io::{Read, Seek};
use std::sync::Arc;

/// An open file or directory.
///
/// File content is read through [`Read`] and [`Seek`]. Directories are
/// listed through [`FileHandle::read_entries`], which follows the "data,
/// then terminal" contract: a read may return entries, and once no more
/// entries will follow it reports a [`Terminal`](crate::Terminal).
///
/// Handles carry cursor state and take `&mut self` for reads; one handle
/// is one traversal. Releasing a handle is dropping it.
pub trait FileHandle: Read + Seek + Send {
    /// Returns metadata for the opened path itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot produce metadata.
    fn stat(&self) -> Result<DirEntry>;

    /// Reads up to `limit` directory entries.
    ///
    /// With [`ReadLimit::All`] every remaining entry is returned. Handles
    /// that are not directories report a terminal error.
    fn read_entries(&mut self, limit: ReadLimit) -> EntryBatch;
}

/// A hierarchical store that can open paths.
pub trait FileSystem: Send + Sync {
    /// Handle type returned by [`FileSystem::open`].
    type Handle: FileHandle;

    /// Opens a file or directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or cannot be opened.
    fn open(&self, path: &StorePath) -> Result<Self::Handle>;
}

impl<S: FileSystem + ?Sized> FileSystem for Arc<S> {
    type Handle = S::Handle;

    fn open(&self, path: &StorePath) -> Result<Self::Handle> {
        (**self).open(path)
    }
}

impl<S: FileSystem + ?Sized> FileSystem for &S {
    type Handle = S::Handle;

    fn open(&self, path: &StorePath) -> Result<Self::Handle> {
        (**self).open(path)
    }
}

impl<H: FileHandle + ?Sized> FileHandle for Box<H> {
    fn stat(&self) -> Result<DirEntry> {
        (**self).stat()
    }

    fn read_entries(&mut self, limit: ReadLimit) -> EntryBatch {
        (**self).read_entries(limit)
    }
}
