//! Error types for adhoc-httpd.
//!
//! `FsError` is what underlying stores report. It is `Clone` so that a
//! terminal error recorded by a directory handle can be handed back on every
//! subsequent read once the handle has drained.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::FsError;
//!
//! let err = FsError::NotFound {
//!     path: "/missing.txt".to_string(),
//! };
//! assert!(err.is_not_found());
//! ```

use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Errors reported by an underlying file store.
///
/// All variants carry the store path the operation was attempted on.
#[derive(Error, Debug, Clone)]
pub enum FsError {
    /// File or directory not found at the specified path
    #[error("File not found: {path}")]
    NotFound {
        /// The path that was not found
        path: String,
    },

    /// Path exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory
        path: String,
    },

    /// Path is a directory where file content was expected
    #[error("Is a directory: {path}")]
    IsADirectory {
        /// The directory path
        path: String,
    },

    /// Path is invalid or malformed
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The invalid path
        path: String,
    },

    /// Path is not absolute (must start with '/')
    #[error("Path must be absolute: {path}")]
    PathNotAbsolute {
        /// The relative path
        path: String,
    },

    /// Path contains invalid components (e.g., '..')
    #[error("Path contains invalid components: {path}")]
    InvalidPathComponent {
        /// The path with invalid components
        path: String,
    },

    /// The store refused access to the path
    #[error("Permission denied: {path}")]
    PermissionDenied {
        /// The path access was denied to
        path: String,
    },

    /// Any other I/O failure, passed through verbatim.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The path the failing operation targeted
        path: String,
        /// Underlying I/O error
        #[source]
        source: Arc<io::Error>,
    },
}

impl FsError {
    /// Maps an I/O error onto the matching variant.
    ///
    /// `NotFound` and `PermissionDenied` kinds get their own variants;
    /// everything else is wrapped in [`FsError::Io`] untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::FsError;
    /// use std::io;
    ///
    /// let err = FsError::from_io("/a", io::Error::from(io::ErrorKind::NotFound));
    /// assert!(err.is_not_found());
    ///
    /// let err = FsError::from_io("/a", io::Error::other("disk on fire"));
    /// assert!(err.is_io());
    /// ```
    #[must_use]
    pub fn from_io(path: impl Into<String>, err: io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Io {
                path,
                source: Arc::new(err),
            },
        }
    }

    /// Returns the path this error refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path }
            | Self::NotADirectory { path }
            | Self::IsADirectory { path }
            | Self::InvalidPath { path }
            | Self::PathNotAbsolute { path }
            | Self::InvalidPathComponent { path }
            | Self::PermissionDenied { path }
            | Self::Io { path, .. } => path,
        }
    }

    /// Returns `true` if this is a file not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a not-a-directory error.
    #[must_use]
    pub const fn is_not_directory(&self) -> bool {
        matches!(self, Self::NotADirectory { .. })
    }

    /// Returns `true` if this is an is-a-directory error.
    #[must_use]
    pub const fn is_a_directory(&self) -> bool {
        matches!(self, Self::IsADirectory { .. })
    }

    /// Returns `true` if this is a permission error.
    #[must_use]
    pub const fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied { .. })
    }

    /// Returns `true` for any malformed path error.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::FsError;
    ///
    /// let error = FsError::InvalidPathComponent {
    ///     path: "/a/../b".to_string(),
    /// };
    ///
    /// assert!(error.is_invalid_path());
    /// ```
    #[must_use]
    pub const fn is_invalid_path(&self) -> bool {
        matches!(
            self,
            Self::InvalidPath { .. }
                | Self::PathNotAbsolute { .. }
                | Self::InvalidPathComponent { .. }
        )
    }

    /// Returns `true` if this is an opaque pass-through I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Errors compare by variant and path. Two `Io` errors are equal when their
/// paths and [`io::ErrorKind`]s match.
impl PartialEq for FsError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Io { path, source },
                Self::Io {
                    path: other_path,
                    source: other_source,
                },
            ) => path == other_path && source.kind() == other_source.kind(),
            _ => {
                std::mem::discriminant(self) == std::mem::discriminant(other)
                    && self.path() == other.path()
            }
        }
    }
}

impl Eq for FsError {}

/// Errors raised while validating configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric setting must be strictly positive.
    #[error("{field} must be greater than zero")]
    Zero {
        /// Name of the offending setting
        field: &'static str,
    },

    /// A setting has a value that cannot be used.
    #[error("Invalid {field}: {reason}")]
    Invalid {
        /// Name of the offending setting
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Type alias for store operation results.
pub type Result<T> = std::result::Result<T, FsError>;
