//! The farm API: method registration, response formats and transports.

pub mod control;
pub mod http;
pub mod methods;
pub mod server;
pub mod snapshot;
pub mod stat_v1;
pub mod stat_v2;
pub mod tcp;

use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::ApiConfig;
use crate::error::Result;
use crate::farm::Farm;
use crate::tracing::prelude::*;

pub use methods::Method;
pub use server::ApiServer;

/// Build an [`ApiServer`] for `farm` as described by `config`.
pub fn build(config: &ApiConfig, farm: Arc<dyn Farm>) -> Result<Arc<ApiServer>> {
    let server = ApiServer::new(config.protocol, farm, config.readonly)?;
    Ok(Arc::new(server))
}

/// Run the transports enabled in `config` until `shutdown` is cancelled.
///
/// All listeners are bound before anything is served, so a port conflict
/// fails the call up front.
pub async fn serve(
    config: &ApiConfig,
    server: Arc<ApiServer>,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut transports: JoinSet<io::Result<()>> = JoinSet::new();

    if let Some(addr) = config.http_addr {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "HTTP JSON-RPC listening");
        let app = http::router(server.clone());
        let shutdown = shutdown.clone();
        transports.spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await
        });
    }

    if let Some(addr) = config.tcp_addr {
        let listener = TcpListener::bind(addr).await?;
        transports.spawn(tcp::serve(listener, server.clone(), shutdown.clone()));
    }

    if transports.is_empty() {
        warn!("No API transport enabled");
        return Ok(());
    }

    while let Some(joined) = transports.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(e) => error!(error = %e, "API transport task failed"),
        }
    }

    Ok(())
}
