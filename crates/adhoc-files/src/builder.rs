//! Builder pattern for constructing in-memory stores.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::{FileHandle, FileSystem, StorePath};
//! use adhoc_httpd_files::MemFsBuilder;
//!
//! let fs = MemFsBuilder::new()
//!     .add_file("/index.html", "<h1>home</h1>")
//!     .add_file("/css/site.css", "body {}")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(fs.file_count(), 2);
//! let css = fs.open(&StorePath::new("/css").unwrap()).unwrap();
//! assert!(css.stat().unwrap().is_dir());
//! ```

use crate::mem::MemFs;
use adhoc_httpd_core::{FsError, Result};

/// Builder for constructing a [`MemFs`].
///
/// Invalid paths are collected and reported by [`MemFsBuilder::build`], so
/// calls can be chained without checking each one.
#[derive(Debug, Default)]
pub struct MemFsBuilder {
    fs: MemFs,
    errors: Vec<FsError>,
}

impl MemFsBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fs: MemFs::new(),
            errors: Vec::new(),
        }
    }

    /// Adds a file to the store being built.
    #[must_use]
    pub fn add_file(mut self, path: impl AsRef<str>, content: impl Into<Vec<u8>>) -> Self {
        if let Err(e) = self.fs.add_file(path, content) {
            self.errors.push(e);
        }
        self
    }

    /// Adds multiple files to the store being built.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_files::MemFsBuilder;
    ///
    /// let files = (0..3).map(|i| (format!("/logs/{i}.log"), "ok"));
    /// let fs = MemFsBuilder::new().add_files(files).build().unwrap();
    /// assert_eq!(fs.file_count(), 3);
    /// ```
    #[must_use]
    pub fn add_files<P, C>(mut self, files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: AsRef<str>,
        C: Into<Vec<u8>>,
    {
        for (path, content) in files {
            if let Err(e) = self.fs.add_file(path, content) {
                self.errors.push(e);
            }
        }
        self
    }

    /// Consumes the builder and returns the store.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered while adding files, if any.
    ///
    /// ```
    /// use adhoc_httpd_files::MemFsBuilder;
    ///
    /// let result = MemFsBuilder::new()
    ///     .add_file("relative/path", "content")
    ///     .build();
    ///
    /// assert!(result.is_err());
    /// ```
    pub fn build(self) -> Result<MemFs> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        Ok(self.fs)
    }

    /// Returns the number of files added so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.fs.file_count()
    }
}
