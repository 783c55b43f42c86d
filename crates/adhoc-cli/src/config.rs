//! Server configuration.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd::ServerConfig;
//!
//! let config = ServerConfig {
//!     host: "::1".to_string(),
//!     port: 9000,
//!     ..ServerConfig::default()
//! };
//! assert_eq!(config.bind_addr(), "[::1]:9000");
//! ```

use crate::listing::ListingFormat;
use adhoc_httpd_core::{ConfigError, OrderConfig};
use std::path::PathBuf;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8000;

/// Everything needed to start a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind; empty binds every interface
    pub host: String,
    /// Port to bind; 0 picks a free one
    pub port: u16,
    /// Directory to serve
    pub root: PathBuf,
    /// Directory reordering parameters
    pub order: OrderConfig,
    /// Listing format used when a request expresses no preference
    pub listing: ListingFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
            order: OrderConfig::default(),
            listing: ListingFormat::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string to bind, with IPv6 literals bracketed.
    ///
    /// An empty host binds the IPv6 unspecified address `[::]`, which also
    /// accepts IPv4 clients on dual-stack hosts.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        let host = self.host.trim();
        if host.is_empty() {
            format!("[::]:{}", self.port)
        } else if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{}", self.port)
        } else {
            format!("{host}:{}", self.port)
        }
    }

    /// Checks the root is a directory and the ordering parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Zero` for a zero window or batch size and
    /// `ConfigError::Invalid` when the root is not an existing directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.order.validate()?;
        if !self.root.is_dir() {
            return Err(ConfigError::Invalid {
                field: "root",
                reason: format!("{} is not a directory", self.root.display()),
            });
        }
        Ok(())
    }
}
