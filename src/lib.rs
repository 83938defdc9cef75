// Public API for integration tests and potential library usage

pub mod api;
pub mod broadcast;
pub mod config;
pub mod content;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod state;
pub mod types;
pub mod ws;

use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Build the HTTP router: socket endpoint, JSON API and static files
pub fn app(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/api/rooms/{code}", get(api::get_room))
        .route("/api/templates", get(api::list_templates))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
