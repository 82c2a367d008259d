use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;
use service::{backend, enrich};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    addr.parse::<SocketAddr>()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {addr}: {e}")).into())
}

/// Construct the backend and enricher selected by `cfg`.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let storage = backend::build_serialized(&cfg.storage).await?;
    let enricher: Arc<dyn enrich::ContactEnricher> = Arc::from(enrich::build_enricher(&cfg.enrichment));
    Ok(ServerState::new(storage, enricher))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    info!(%addr, backend = %cfg.storage.backend, "starting contact server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
