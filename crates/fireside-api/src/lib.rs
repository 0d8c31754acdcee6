//! Fireside: HTTP and WebSocket server for narrator-driven story sessions.

use std::path::Path;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod collaborators;
pub mod config;
pub mod error;
pub mod identity;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod ws;

/// Builds the full router: health, session routes under `/api`, and stored
/// audio under `/audio`.
pub fn app(state: state::AppState, audio_dir: &Path) -> Router {
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    Router::new()
        .merge(routes::health::router())
        .nest("/api", routes::sessions::router())
        .nest_service("/audio", ServeDir::new(audio_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
