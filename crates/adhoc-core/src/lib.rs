//! Core types, traits, and errors for adhoc-httpd.
//!
//! This crate provides the foundational types shared by the ordering layer,
//! the underlying stores, and the HTTP server.
//!
//! # Architecture
//!
//! The core consists of:
//! - Directory entry metadata and the bounded read contract
//!   (`DirEntry`, `ReadLimit`, `EntryBatch`, `Terminal`)
//! - Validated store paths (`StorePath`)
//! - Store capability traits (`FileSystem`, `FileHandle`)
//! - Error types and ordering configuration

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod config;
mod error;
mod path;
mod types;

pub mod traits;

pub use config::{DEFAULT_MIN_BATCH_SIZE, DEFAULT_WINDOW_SIZE, OrderConfig, OrderConfigBuilder};
pub use error::{ConfigError, FsError, Result};
pub use path::StorePath;
pub use traits::{FileHandle, FileSystem};
pub use types::{DirEntry, EntryBatch, ReadLimit, Terminal};
