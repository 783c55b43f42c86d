//! Command-line arguments.

use crate::config::{DEFAULT_PORT, ServerConfig};
use crate::listing::ListingFormat;
use adhoc_httpd_core::{DEFAULT_MIN_BATCH_SIZE, DEFAULT_WINDOW_SIZE, OrderConfig};
use clap::Parser;
use std::path::PathBuf;

/// Serve a directory over HTTP.
///
/// Directory listings come out sorted by name while holding only a bounded
/// window of entries in memory, so huge directories stay cheap to list.
#[derive(Parser, Debug)]
#[command(name = "adhoc-httpd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory to serve
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Address to listen on (all interfaces when omitted)
    #[arg(long, env = "ADHOC_HTTPD_HOST", default_value = "")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "ADHOC_HTTPD_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Entries buffered per directory while sorting
    #[arg(long, env = "ADHOC_HTTPD_WINDOW_SIZE", default_value_t = DEFAULT_WINDOW_SIZE)]
    pub window_size: usize,

    /// Smallest read issued to the underlying directory
    #[arg(
        long = "min-batch",
        env = "ADHOC_HTTPD_MIN_BATCH",
        default_value_t = DEFAULT_MIN_BATCH_SIZE
    )]
    pub min_batch_size: usize,

    /// Listing format when the client expresses no preference
    #[arg(long, value_enum, default_value_t = ListingFormat::Html)]
    pub listing: ListingFormat,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Builds the server configuration these arguments describe.
    #[must_use]
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            root: self.dir,
            order: OrderConfig::builder()
                .window_size(self.window_size)
                .min_batch_size(self.min_batch_size)
                .build(),
            listing: self.listing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["adhoc-httpd"]).unwrap();
        assert!(!cli.verbose);
        let config = cli.into_config();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.port, 8000);
        assert_eq!(config.order.window_size, 1000);
        assert_eq!(config.order.min_batch_size, 100);
        assert_eq!(config.listing, ListingFormat::Html);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "adhoc-httpd",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--window-size",
            "64",
            "--min-batch",
            "8",
            "--listing",
            "json",
            "-v",
            "/srv/www",
        ])
        .unwrap();
        assert!(cli.verbose);

        let config = cli.into_config();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.root, PathBuf::from("/srv/www"));
        assert_eq!(config.order.window_size, 64);
        assert_eq!(config.order.min_batch_size, 8);
        assert_eq!(config.listing, ListingFormat::Json);
    }

    #[test]
    fn test_rejects_extra_positional() {
        assert!(Cli::try_parse_from(["adhoc-httpd", "a", "b"]).is_err());
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["adhoc-httpd", "--port", "70000"]).is_err());
        assert!(Cli::try_parse_from(["adhoc-httpd", "--listing", "xml"]).is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
