//! adhoc-httpd library.
//!
//! The HTTP side of adhoc-httpd: configuration, request handling, directory
//! listing rendering, and conditional/partial response helpers. The binary
//! in `main.rs` is a thin wrapper around [`server::Server`].

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod headers;
pub mod listing;
pub mod server;

pub use cli::Cli;
pub use config::ServerConfig;
pub use error::ServeError;
pub use listing::ListingFormat;
pub use server::{Server, router};
