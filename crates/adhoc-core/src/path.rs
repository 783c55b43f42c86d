//! Validated store paths.
//!
//! Every path handed to a [`FileSystem`](crate::traits::FileSystem) is a
//! `StorePath`: absolute, `/`-separated, and free of `..` components, so a
//! store can join it onto its root without escaping it.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::StorePath;
//!
//! let path = StorePath::new("/docs//guide/./intro.md").unwrap();
//! assert_eq!(path.as_str(), "/docs/guide/intro.md");
//! assert_eq!(path.file_name(), Some("intro.md"));
//!
//! assert!(StorePath::new("relative/path").is_err());
//! assert!(StorePath::new("/parent/../escape").is_err());
//! ```

use crate::error::{FsError, Result};
use std::fmt;

/// A validated, normalized store path.
///
/// Normalization collapses repeated separators, drops `.` components and
/// strips any trailing separator. The root is `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorePath(String);

impl StorePath {
    /// Creates a new `StorePath`.
    ///
    /// # Errors
    ///
    /// Returns `FsError::InvalidPath` if the path is empty or contains a NUL
    /// byte or a backslash.
    /// Returns `FsError::PathNotAbsolute` if the path does not start with '/'.
    /// Returns `FsError::InvalidPathComponent` if the path contains '..'.
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref();

        if raw.is_empty() || raw.contains('\0') || raw.contains('\\') {
            return Err(FsError::InvalidPath {
                path: raw.to_string(),
            });
        }

        if !raw.starts_with('/') {
            return Err(FsError::PathNotAbsolute {
                path: raw.to_string(),
            });
        }

        let mut normalized = String::with_capacity(raw.len());
        for component in raw.split('/') {
            match component {
                "" | "." => {}
                ".." => {
                    return Err(FsError::InvalidPathComponent {
                        path: raw.to_string(),
                    });
                }
                name => {
                    normalized.push('/');
                    normalized.push_str(name);
                }
            }
        }

        if normalized.is_empty() {
            normalized.push('/');
        }

        Ok(Self(normalized))
    }

    /// The root path `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the parent directory, or `None` for the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::StorePath;
    ///
    /// let path = StorePath::new("/a/b")?;
    /// assert_eq!(path.parent().unwrap().as_str(), "/a");
    /// assert_eq!(StorePath::new("/a")?.parent().unwrap().as_str(), "/");
    /// assert!(StorePath::root().parent().is_none());
    /// # Ok::<(), adhoc_httpd_core::FsError>(())
    /// ```
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        self.0.rfind('/').map(|pos| {
            if pos == 0 {
                Self::root()
            } else {
                Self(self.0[..pos].to_string())
            }
        })
    }

    /// Returns the last component, or `None` for the root.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        if self.is_root() {
            return None;
        }
        self.0.rsplit('/').next()
    }

    /// Appends a relative path below this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined path fails validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use adhoc_httpd_core::StorePath;
    ///
    /// let dir = StorePath::new("/site")?;
    /// assert_eq!(dir.join("index.html")?.as_str(), "/site/index.html");
    /// assert!(dir.join("../etc/passwd").is_err());
    /// # Ok::<(), adhoc_httpd_core::FsError>(())
    /// ```
    pub fn join(&self, relative: &str) -> Result<Self> {
        Self::new(format!("{}/{relative}", self.0))
    }

    /// Iterates over the path's components, root excluded.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|c| !c.is_empty())
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_path_new_valid() {
        let path = StorePath::new("/site/index.html").unwrap();
        assert_eq!(path.as_str(), "/site/index.html");
    }

    #[test]
    fn test_store_path_normalizes() {
        assert_eq!(StorePath::new("/a//b/").unwrap().as_str(), "/a/b");
        assert_eq!(StorePath::new("/./a/.").unwrap().as_str(), "/a");
        assert_eq!(StorePath::new("///").unwrap().as_str(), "/");
    }

    #[test]
    fn test_store_path_relative_fails() {
        let err = StorePath::new("relative/path").unwrap_err();
        assert!(matches!(err, FsError::PathNotAbsolute { .. }));
    }

    #[test]
    fn test_store_path_parent_dir_fails() {
        let err = StorePath::new("/parent/../escape").unwrap_err();
        assert!(matches!(err, FsError::InvalidPathComponent { .. }));
        assert!(StorePath::new("/..").is_err());
    }

    #[test]
    fn test_store_path_dots_in_names_allowed() {
        let path = StorePath::new("/archive..old/file...txt").unwrap();
        assert_eq!(path.file_name(), Some("file...txt"));
    }

    #[test]
    fn test_store_path_rejects_garbage() {
        assert!(StorePath::new("").unwrap_err().is_invalid_path());
        assert!(StorePath::new("/a\0b").unwrap_err().is_invalid_path());
        assert!(StorePath::new("/a\\..\\b").unwrap_err().is_invalid_path());
    }

    #[test]
    fn test_store_path_root() {
        let root = StorePath::root();
        assert!(root.is_root());
        assert_eq!(root.file_name(), None);
        assert_eq!(root.components().count(), 0);
        assert_eq!(root.join("x").unwrap().as_str(), "/x");
    }

    #[test]
    fn test_store_path_components() {
        let path = StorePath::new("/a/b/c").unwrap();
        assert_eq!(path.components().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_store_path_display() {
        let path = StorePath::new("/test.txt").unwrap();
        assert_eq!(format!("{path}"), "/test.txt");
    }
}
