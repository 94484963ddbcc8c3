use std::sync::Arc;

use axum::Router;

use crate::{services::gateway::WsHub, state::SharedState};

/// Swagger UI and OpenAPI document routes.
pub mod docs;
/// Health check routes.
pub mod health;
/// Game WebSocket endpoint.
pub mod websocket;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState, hub: Arc<WsHub>) -> Router<()> {
    let api_router = health::router();
    let docs_router = docs::router(state.clone());
    let ws_router = websocket::router(state.clone(), hub);

    api_router
        .merge(docs_router)
        .with_state(state)
        .merge(ws_router)
}
