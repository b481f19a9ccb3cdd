//! HTTP API server for distance calculation and visualization.

pub mod routes;

use crate::chart::Renderer;
use crate::config::{EngineConfig, RenderConfig};
use crate::engine::DistanceEngine;
use std::sync::Arc;

/// Shared application state for the HTTP server.
///
/// Both engines are immutable after construction, so handlers share them
/// without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: DistanceEngine,
    pub renderer: Renderer,
}

impl AppState {
    pub fn new(engine_config: EngineConfig, render_config: RenderConfig) -> crate::Result<Self> {
        let engine = DistanceEngine::new(engine_config)?;
        let renderer = Renderer::new(render_config, engine.clone())?;
        Ok(Self { engine, renderer })
    }
}

/// Start the HTTP server.
pub async fn start(addr: &str, state: AppState) -> anyhow::Result<()> {
    let app = routes::create_router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
