//! Single-upstream HTTP relay.
//!
//! Accepts any request on a local port and relays it to one fixed remote
//! origin, returning the origin's status, body and headers to the caller.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                    RELAY                     │
//!                        │                                              │
//!     Client Request     │  ┌─────────┐    ┌─────────┐   ┌───────────┐  │
//!     ───────────────────┼─▶│  http   │───▶│ forward │──▶│   hyper   │──┼──▶ Upstream
//!                        │  │ server  │    │ headers │   │  client   │  │    Origin
//!     Client Response    │  │         │◀───│ outcome │◀──│           │◀─┼───
//!     ◀──────────────────┼──│         │    └─────────┘   └───────────┘  │
//!                        │  │         │    ┌─────────┐                  │
//!                        │  │ GET ip  │───▶│   ip    │──────────────────┼──▶ IP echo
//!                        │  └─────────┘    │resolver │                  │    service
//!                        │                 └─────────┘                  │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use upstream_relay::config::{self, ProxyConfig};
use upstream_relay::lifecycle::{signals, startup, Shutdown};
use upstream_relay::observability::init_logging;

#[derive(Parser)]
#[command(name = "upstream-relay")]
#[command(about = "Relays every inbound HTTP request to a single upstream origin", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interface to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(host) = cli.host {
        config.listener.host = host;
    }
    if let Some(port) = cli.port {
        config.listener.port = port;
    }
    config::validate_config(&config).map_err(config::ConfigError::Validation)?;

    let _log_guard = init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config_file = ?cli.config,
        "upstream-relay starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        header_policy = ?config.upstream.headers,
        ip_endpoint = %config.ip_resolver.endpoint_path,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
