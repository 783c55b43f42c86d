//! Capability traits for underlying file stores.
//!
//! A store is modelled as two levels: a [`FileSystem`] that opens validated
//! paths, and the [`FileHandle`] it returns, which reads file bytes and
//! lists directories through bounded, cursor-style reads.
//!
//! # Module Structure
//!
//! - `filesystem` - `FileSystem` and `FileHandle`
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::traits::{FileHandle, FileSystem};
//! use adhoc_httpd_core::{DirEntry, EntryBatch, FsError, ReadLimit, Result, StorePath};
//! use std::io::{self, Cursor, Read, Seek, SeekFrom};
//!
//! struct OneFile;
//!
//! struct Handle(Cursor<Vec<u8>>);
//!
//! impl Read for Handle {
//!     fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
//!         self.0.read(buf)
//!     }
//! }
//!
//! impl Seek for Handle {
//!     fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
//!         self.0.seek(pos)
//!     }
//! }
//!
//! impl FileHandle for Handle {
//!     fn stat(&self) -> Result<DirEntry> {
//!         Ok(DirEntry::file("hello.txt", 5))
//!     }
//!
//!     fn read_entries(&mut self, _limit: ReadLimit) -> EntryBatch {
//!         EntryBatch::failed(FsError::NotADirectory {
//!             path: "/hello.txt".to_string(),
//!         })
//!     }
//! }
//!
//! impl FileSystem for OneFile {
//!     type Handle = Handle;
//!
//!     fn open(&self, path: &StorePath) -> Result<Handle> {
//!         if path.as_str() == "/hello.txt" {
//!             Ok(Handle(Cursor::new(b"hello".to_vec())))
//!         } else {
//!             Err(FsError::NotFound { path: path.to_string() })
//!         }
//!     }
//! }
//!
//! let fs = OneFile;
//! let mut handle = fs.open(&StorePath::new("/hello.txt").unwrap()).unwrap();
//! let mut body = String::new();
//! handle.read_to_string(&mut body).unwrap();
//! assert_eq!(body, "hello");
//! ```

mod filesystem;

pub use filesystem::{FileHandle, FileSystem};
