use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};

use crate::{
    services::{gateway::WsHub, websocket_service},
    state::SharedState,
};

/// State handed to the WebSocket endpoint: the engine plus the multicast hub.
#[derive(Clone)]
pub struct WsState {
    app: SharedState,
    hub: Arc<WsHub>,
}

#[utoipa::path(
    get,
    path = "/ws",
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
/// Upgrade the HTTP connection into a game WebSocket session.
pub async fn ws_handler(State(state): State<WsState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| websocket_service::handle_socket(state.app, state.hub, socket))
}

/// Configure the WebSocket endpoint.
pub fn router(app: SharedState, hub: Arc<WsHub>) -> Router<()> {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(WsState { app, hub })
}
