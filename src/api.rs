//! HTTP API endpoints.
//!
//! Read-only lookups used by the frontend before opening a socket.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::content::CategoryStats;
use crate::protocol::ServerMessage;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatesResponse {
    pub provider: String,
    pub categories: Vec<CategoryStats>,
}

/// Look up a room before joining it.
///
/// GET /api/rooms/{code}
pub async fn get_room(State(state): State<Arc<AppState>>, Path(code): Path<String>) -> Response {
    match state.registry.room_summary(&code).await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => (StatusCode::NOT_FOUND, Json(ServerMessage::from(&e))).into_response(),
    }
}

/// List template categories.
///
/// GET /api/templates
pub async fn list_templates(State(state): State<Arc<AppState>>) -> Json<TemplatesResponse> {
    let provider = state.provider();
    Json(TemplatesResponse {
        provider: provider.name().to_string(),
        categories: provider.categories(),
    })
}
