//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the HTTP server from a validated configuration
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, after every client is built

use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;

/// Start serving and block until shutdown completes.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), ProxyError> {
    let server = HttpServer::new(config)?;

    let address = server.config().listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ProxyError::Bind { address, source })?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Relay listening on http://{}",
        local_addr
    );

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
