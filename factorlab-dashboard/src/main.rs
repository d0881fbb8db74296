mod error;
mod figures;
mod form;
mod page;
mod routes;
mod state;

use anyhow::Context;
use axum::Router;
use factorlab_core::config::AppConfig;
use factorlab_core::data::{DataProvider, YahooProvider};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

// Not `#[tokio::main]`: the blocking HTTP client must be created and dropped
// outside the async runtime.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional first argument: path to factorlab.toml.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let cfg = AppConfig::load(config_path.as_deref())?;

    let provider: Arc<dyn DataProvider> = Arc::new(YahooProvider::new(cfg.provider.clone())?);
    let state = AppState::new(cfg.dashboard.clone(), Arc::clone(&provider));

    let app = Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let bind = format!("{}:{}", cfg.dashboard.bind, cfg.dashboard.port);
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        tracing::info!("FactorLab dashboard listening on http://{addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        anyhow::Ok(())
    })?;
    drop(runtime);

    // Last reference to the blocking client is released here.
    drop(provider);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
