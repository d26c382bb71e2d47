//! HTTP server initialization and runtime setup.
//!
//! Handles origin and edge cache connections, the write-back worker, and the Axum
//! server lifecycle.

use crate::application::services::RedirectResolver;
use crate::config::Config;
use crate::domain::write_back_worker::run_write_back_worker;
use crate::infrastructure::cache::{EdgeCache, MokaEdgeCache, RedisEdgeCache};
use crate::infrastructure::origin::RedisOrigin;
use crate::routes::app;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Upper bound for applying queued write-backs at shutdown.
const WRITE_BACK_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Origin store client (Redis)
/// - Edge cache (Redis when configured, in-memory otherwise or on failure)
/// - Background write-back worker
/// - Axum HTTP server with graceful shutdown
///
/// On shutdown the write-back queue is closed and every queued write is
/// applied before this function returns.
///
/// # Errors
///
/// Returns an error if:
/// - Origin store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let origin = RedisOrigin::connect(
        &config.origin_redis_url,
        config.origin_key_prefix.clone(),
        config.origin_timeout(),
    )
    .await
    .context("Failed to connect to origin store")?;
    tracing::info!("Connected to origin store");

    let edge_cache = open_edge_cache(&config).await;

    let (write_back_tx, write_back_rx) = mpsc::channel(config.write_back_queue_capacity);
    let worker = tokio::spawn(run_write_back_worker(
        write_back_rx,
        edge_cache.clone(),
        config.write_back_concurrency,
    ));
    tracing::info!("Write-back worker started");

    let resolver = Arc::new(RedirectResolver::new(
        edge_cache,
        Arc::new(origin),
        write_back_tx,
        config.resolver_settings(),
    ));

    let state = AppState::new(resolver, &config.public_scheme, config.behind_proxy);

    let service = app(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last write-back sender) is gone once serve returns.
    tracing::info!("Draining write-back queue");
    match tokio::time::timeout(WRITE_BACK_DRAIN_TIMEOUT, worker).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!("Write-back worker panicked: {}", e),
        Err(_) => tracing::warn!(
            "Write-back queue not drained after {}s, abandoning pending writes",
            WRITE_BACK_DRAIN_TIMEOUT.as_secs()
        ),
    }

    Ok(())
}

/// Opens the edge cache once per process.
async fn open_edge_cache(config: &Config) -> Arc<dyn EdgeCache> {
    if let Some(redis_url) = &config.edge_redis_url {
        match RedisEdgeCache::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Edge cache enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect edge cache Redis: {}. Using in-memory cache.", e);
            }
        }
    }

    Arc::new(MokaEdgeCache::new(config.edge_cache_capacity))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
