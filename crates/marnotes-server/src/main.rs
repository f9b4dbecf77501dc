//! marnotes document server entry point.
//!
//! Prepares the documents directory, loads the optional public key, then
//! starts the Axum HTTP server with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use marnotes_server::config::ServerConfig;
use marnotes_server::state::AppState;
use marnotes_server::store::DocumentStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = ServerConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(docs_dir = %config.docs_dir.display(), "marnotes server starting");

    let state = build_app_state(&config).await?;
    let app = marnotes_server::build_router(state);

    // Bind and serve.
    let listener = marnotes_server::bind(config.bind_addr, config.port_search)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;
    let addr = listener.local_addr().context("failed to read bound address")?;

    info!(%addr, "marnotes server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("marnotes server stopped");
    Ok(())
}

/// Build the shared application state.
async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let store = DocumentStore::new(&config.docs_dir);
    let created = store.ensure_dir().await.with_context(|| {
        format!(
            "failed to create documents directory {}",
            config.docs_dir.display()
        )
    })?;
    if created {
        info!(path = %config.docs_dir.display(), "created documents directory");
    }

    let mut state = AppState::new(store);

    if let Some(path) = &config.public_key_path {
        let pem = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read public key {}", path.display()))?;
        info!(path = %path.display(), "publishing public key");
        state = state.with_public_key(pem);
    }

    Ok(Arc::new(state))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
