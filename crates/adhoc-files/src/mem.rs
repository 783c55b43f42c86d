//! In-memory file store.
//!
//! Files live in a `HashMap` keyed by [`StorePath`]; directories are implied
//! by the paths of the files below them. Directory listings come out in
//! hash order, which makes this store a convenient stand-in for storage that
//! reports entries in no particular order.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::{FileHandle, FileSystem, ReadLimit, StorePath};
//! use adhoc_httpd_files::MemFs;
//! use std::io::Read;
//!
//! let mut fs = MemFs::new();
//! fs.add_file("/site/index.html", "<h1>hi</h1>").unwrap();
//!
//! let mut file = fs.open(&StorePath::new("/site/index.html").unwrap()).unwrap();
//! let mut body = String::new();
//! file.read_to_string(&mut body).unwrap();
//! assert_eq!(body, "<h1>hi</h1>");
//!
//! let mut dir = fs.open(&StorePath::root()).unwrap();
//! assert_eq!(dir.read_entries(ReadLimit::All).names(), vec!["site"]);
//! ```

use adhoc_httpd_core::{
    DirEntry, EntryBatch, FileHandle, FileSystem, FsError, ReadLimit, Result, StorePath,
};
use std::collections::{HashMap, HashSet};
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;
use std::time::SystemTime;

const FILE_MODE: u32 = 0o644;
const DIR_MODE: u32 = 0o755;

#[derive(Debug, Clone)]
struct MemFile {
    content: Arc<[u8]>,
    modified: SystemTime,
}

/// An in-memory file store.
///
/// # Thread Safety
///
/// This type is `Send` and `Sync`; file contents are shared with open
/// handles, so handles stay valid after the store is modified.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    files: HashMap<StorePath, MemFile>,
    /// Every directory implied by a file path, root excluded.
    dirs: HashSet<StorePath>,
}

impl MemFs {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            dirs: HashSet::new(),
        }
    }

    /// Adds a file, replacing any file already at the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path is invalid, is the root, or would place
    /// a file where a directory is implied (or the other way around).
    pub fn add_file(&mut self, path: impl AsRef<str>, content: impl Into<Vec<u8>>) -> Result<()> {
        let path = StorePath::new(path)?;

        if path.is_root() || self.has_children(&path) {
            return Err(FsError::IsADirectory {
                path: path.to_string(),
            });
        }
        let mut ancestors = Vec::new();
        let mut ancestor = path.parent();
        while let Some(dir) = ancestor {
            if self.files.contains_key(&dir) {
                return Err(FsError::NotADirectory {
                    path: dir.to_string(),
                });
            }
            ancestor = dir.parent();
            if !dir.is_root() {
                ancestors.push(dir);
            }
        }
        self.dirs.extend(ancestors);

        let content: Vec<u8> = content.into();
        self.files.insert(
            path,
            MemFile {
                content: Arc::from(content),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    /// Returns the total number of files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    fn has_children(&self, dir: &StorePath) -> bool {
        self.dirs.contains(dir)
    }

    /// Direct children of `dir`, in hash order.
    fn children(&self, dir: &StorePath) -> Vec<DirEntry> {
        let prefix = dir_prefix(dir);
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (path, file) in &self.files {
            let Some(relative) = path.as_str().strip_prefix(&prefix) else {
                continue;
            };
            match relative.split_once('/') {
                None => {
                    entries.push(
                        DirEntry::file(relative, file.content.len() as u64)
                            .with_mode(FILE_MODE)
                            .with_modified(file.modified),
                    );
                }
                Some((subdir, _)) => {
                    if seen.insert(subdir) {
                        entries.push(DirEntry::dir(subdir).with_mode(DIR_MODE));
                    }
                }
            }
        }

        entries
    }
}

fn dir_prefix(dir: &StorePath) -> String {
    if dir.is_root() {
        "/".to_string()
    } else {
        format!("{dir}/")
    }
}

impl FileSystem for MemFs {
    type Handle = MemHandle;

    fn open(&self, path: &StorePath) -> Result<MemHandle> {
        if let Some(file) = self.files.get(path) {
            let name = path.file_name().unwrap_or_default();
            return Ok(MemHandle::File {
                path: path.clone(),
                stat: DirEntry::file(name, file.content.len() as u64)
                    .with_mode(FILE_MODE)
                    .with_modified(file.modified),
                cursor: Cursor::new(Arc::clone(&file.content)),
            });
        }

        if path.is_root() || self.has_children(path) {
            let name = path.file_name().unwrap_or("/");
            return Ok(MemHandle::Dir {
                path: path.clone(),
                stat: DirEntry::dir(name).with_mode(DIR_MODE),
                entries: self.children(path).into_iter(),
            });
        }

        Err(FsError::NotFound {
            path: path.to_string(),
        })
    }
}

/// Handle to an open [`MemFs`] file or directory.
///
/// Directory handles snapshot their children when opened.
#[derive(Debug)]
pub enum MemHandle {
    /// An open file.
    File {
        /// Path the handle was opened with
        path: StorePath,
        /// Metadata captured at open
        stat: DirEntry,
        /// Read position over the shared content
        cursor: Cursor<Arc<[u8]>>,
    },
    /// An open directory.
    Dir {
        /// Path the handle was opened with
        path: StorePath,
        /// Metadata captured at open
        stat: DirEntry,
        /// Entries not yet read
        entries: std::vec::IntoIter<DirEntry>,
    },
}

impl Read for MemHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File { cursor, .. } => cursor.read(buf),
            Self::Dir { path, .. } => Err(io::Error::other(FsError::IsADirectory {
                path: path.to_string(),
            })),
        }
    }
}

impl Seek for MemHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File { cursor, .. } => cursor.seek(pos),
            Self::Dir { path, .. } => Err(io::Error::other(FsError::IsADirectory {
                path: path.to_string(),
            })),
        }
    }
}

impl FileHandle for MemHandle {
    fn stat(&self) -> Result<DirEntry> {
        match self {
            Self::File { stat, .. } | Self::Dir { stat, .. } => Ok(stat.clone()),
        }
    }

    fn read_entries(&mut self, limit: ReadLimit) -> EntryBatch {
        match self {
            Self::File { path, .. } => EntryBatch::failed(FsError::NotADirectory {
                path: path.to_string(),
            }),
            Self::Dir { entries, .. } => {
                let batch: Vec<DirEntry> = match limit.goal() {
                    Some(n) => entries.by_ref().take(n).collect(),
                    None => entries.by_ref().collect(),
                };
                if batch.is_empty() {
                    EntryBatch::end_of_stream()
                } else {
                    EntryBatch::new(batch)
                }
            }
        }
    }
}
