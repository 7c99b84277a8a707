//! UI server with the route gate in front

use crate::error::{Error, Result};
use crate::gate::{route_gate, RouteGate};
use axum::{middleware::from_fn_with_state, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory containing the built UI
    pub static_dir: PathBuf,
}

/// Router serving the UI from disk, every navigation passing the gate.
///
/// Unknown paths fall back to `index.html` so client-side routes resolve.
pub fn router(config: &ServerConfig, gate: RouteGate) -> Router {
    let index = config.static_dir.join("index.html");
    let files = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    Router::new().fallback_service(files).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .layer(CookieManagerLayer::new())
            .layer(from_fn_with_state(Arc::new(gate), route_gate)),
    )
}

/// Start the UI server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    if !config.static_dir.is_dir() {
        return Err(Error::config(format!(
            "UI directory not found: {}",
            config.static_dir.display()
        )));
    }

    let app = router(&config, RouteGate::new());
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::server(format!("Failed to bind {addr}: {e}")))?;

    info!("Serving {} on http://{addr}", config.static_dir.display());
    axum::serve(listener, app)
        .await
        .map_err(|e| Error::server(e.to_string()))
}
