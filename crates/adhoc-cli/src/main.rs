//! adhoc-httpd: serve a directory over HTTP.
//!
//! # Examples
//!
//! ```bash
//! # Serve the current directory on port 8000
//! adhoc-httpd
//!
//! # Serve /srv/www on localhost only, listing directories as JSON
//! adhoc-httpd --host 127.0.0.1 --port 8080 --listing json /srv/www
//! ```

use adhoc_httpd::{Cli, Server};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = cli.into_config();
    let server = Server::bind(&config).await?;
    let addr = server.local_addr()?;
    tracing::info!("Serving {:?} at http://{addr}/", config.root);

    server.run_until(shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

/// Initializes logging infrastructure.
///
/// `--verbose` forces debug output; otherwise `RUST_LOG` applies, falling
/// back to info.
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
