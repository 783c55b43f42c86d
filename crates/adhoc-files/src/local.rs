//! Local disk store rooted at a directory.
//!
//! [`LocalFs`] maps validated [`StorePath`]s onto a root directory. Since
//! `StorePath` rejects `..` components, a path can only name something
//! below the root (symbolic links inside the tree are followed, as a
//! standard static file server does).
//!
//! Directories are listed straight from [`std::fs::ReadDir`] in whatever
//! order the operating system reports them, in bounded reads.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::{FileHandle, FileSystem, ReadLimit, StorePath};
//! use adhoc_httpd_files::LocalFs;
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! # std::fs::write(temp.path().join("hello.txt"), "hi").unwrap();
//! let fs = LocalFs::new(temp.path()).unwrap();
//! let mut root = fs.open(&StorePath::root()).unwrap();
//!
//! let batch = root.read_entries(ReadLimit::All);
//! assert_eq!(batch.names(), vec!["hello.txt"]);
//! ```

use adhoc_httpd_core::{
    DirEntry, EntryBatch, FileHandle, FileSystem, FsError, ReadLimit, Result, StorePath, Terminal,
};
use std::fs::{self, File, Metadata, ReadDir};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A file store backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Creates a store serving the tree below `root`.
    ///
    /// The root is canonicalized once, up front.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if `root` does not exist and
    /// `FsError::NotADirectory` if it is not a directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let display = root.display().to_string();
        let root = fs::canonicalize(root).map_err(|e| FsError::from_io(display.clone(), e))?;

        if !root.is_dir() {
            return Err(FsError::NotADirectory { path: display });
        }

        Ok(Self { root })
    }

    /// The canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a store path onto the local filesystem.
    #[must_use]
    pub fn resolve(&self, path: &StorePath) -> PathBuf {
        let mut full = self.root.clone();
        full.extend(path.components());
        full
    }
}

impl FileSystem for LocalFs {
    type Handle = LocalHandle;

    fn open(&self, path: &StorePath) -> Result<LocalHandle> {
        let full = self.resolve(path);
        let meta = fs::metadata(&full).map_err(|e| FsError::from_io(path.as_str(), e))?;
        let name = path.file_name().unwrap_or("/");
        let stat = entry_from_metadata(name, &meta);

        if meta.is_dir() {
            let entries = fs::read_dir(&full).map_err(|e| FsError::from_io(path.as_str(), e))?;
            tracing::trace!(%path, "opened local directory");
            Ok(LocalHandle::Dir {
                path: path.clone(),
                stat,
                entries,
                terminal: None,
            })
        } else {
            let file = File::open(&full).map_err(|e| FsError::from_io(path.as_str(), e))?;
            Ok(LocalHandle::File {
                path: path.clone(),
                stat,
                file,
            })
        }
    }
}

/// Handle to an open [`LocalFs`] file or directory.
#[derive(Debug)]
pub enum LocalHandle {
    /// An open regular file (or anything else that is not a directory).
    File {
        /// Path the handle was opened with
        path: StorePath,
        /// Metadata captured at open
        stat: DirEntry,
        /// The open file
        file: File,
    },
    /// An open directory.
    Dir {
        /// Path the handle was opened with
        path: StorePath,
        /// Metadata captured at open
        stat: DirEntry,
        /// Directory stream
        entries: ReadDir,
        /// Set once the stream has ended or failed
        terminal: Option<Terminal>,
    },
}

impl Read for LocalHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::File { file, .. } => file.read(buf),
            Self::Dir { path, .. } => Err(io::Error::other(FsError::IsADirectory {
                path: path.to_string(),
            })),
        }
    }
}

impl Seek for LocalHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::File { file, .. } => file.seek(pos),
            Self::Dir { path, .. } => Err(io::Error::other(FsError::IsADirectory {
                path: path.to_string(),
            })),
        }
    }
}

impl FileHandle for LocalHandle {
    fn stat(&self) -> Result<DirEntry> {
        match self {
            Self::File { stat, .. } | Self::Dir { stat, .. } => Ok(stat.clone()),
        }
    }

    fn read_entries(&mut self, limit: ReadLimit) -> EntryBatch {
        let (path, entries, terminal) = match self {
            Self::File { path, .. } => {
                return EntryBatch::failed(FsError::NotADirectory {
                    path: path.to_string(),
                });
            }
            Self::Dir {
                path,
                entries,
                terminal,
                ..
            } => (path, entries, terminal),
        };

        if let Some(done) = terminal {
            return EntryBatch::with_terminal(Vec::new(), done.clone());
        }

        let mut batch = Vec::new();
        while !limit.is_met(batch.len()) {
            match entries.next() {
                Some(Ok(entry)) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    // Entry metadata does not follow symlinks.
                    match entry.metadata() {
                        Ok(meta) => batch.push(entry_from_metadata(name, &meta)),
                        Err(e) => {
                            let failed = Terminal::Failed(FsError::from_io(
                                format!("{}/{name}", path.as_str().trim_end_matches('/')),
                                e,
                            ));
                            *terminal = Some(failed.clone());
                            return EntryBatch::with_terminal(batch, failed);
                        }
                    }
                }
                Some(Err(e)) => {
                    let failed = Terminal::Failed(FsError::from_io(path.as_str(), e));
                    *terminal = Some(failed.clone());
                    return EntryBatch::with_terminal(batch, failed);
                }
                None => {
                    *terminal = Some(Terminal::EndOfStream);
                    break;
                }
            }
        }

        if batch.is_empty() && terminal.is_some() {
            EntryBatch::end_of_stream()
        } else {
            EntryBatch::new(batch)
        }
    }
}

fn entry_from_metadata(name: impl Into<String>, meta: &Metadata) -> DirEntry {
    let entry = DirEntry::new(name, meta.is_dir())
        .with_size(meta.len())
        .with_mode(mode_bits(meta));
    match meta.modified() {
        Ok(modified) => entry.with_modified(modified),
        Err(_) => entry,
    }
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &Metadata) -> u32 {
    match (meta.is_dir(), meta.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}
