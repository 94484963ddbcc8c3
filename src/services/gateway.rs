//! Outbound event gateway: the notifier seam and its WebSocket implementation.

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::dto::ws::ServerMessage;

/// Boundary through which the engine publishes events to a room's audience.
///
/// The engine never talks to sockets directly; it is handed one of these at
/// construction. Production wires in [`WsHub`]; tests substitute a recorder.
pub trait RoomNotifier: Send + Sync {
    /// Deliver a message to every participant connected to `room_id`.
    fn publish(&self, room_id: &str, message: &ServerMessage);
}

/// Per-room multicast hub over the connected WebSocket writer channels.
#[derive(Debug, Default)]
pub struct WsHub {
    rooms: DashMap<String, DashMap<Uuid, mpsc::UnboundedSender<Message>>>,
}

impl WsHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection's writer channel under a room.
    pub fn join(&self, room_id: &str, client: Uuid, tx: mpsc::UnboundedSender<Message>) {
        self.rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(client, tx);
    }

    /// Drop a connection from a room, e.g. on disconnect.
    pub fn leave(&self, room_id: &str, client: &Uuid) {
        if let Some(room) = self.rooms.get(room_id) {
            room.remove(client);
        }
    }

    /// Number of connections currently subscribed to a room.
    pub fn subscriber_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map(|room| room.len()).unwrap_or(0)
    }
}

impl RoomNotifier for WsHub {
    fn publish(&self, room_id: &str, message: &ServerMessage) {
        let Some(room) = self.rooms.get(room_id) else {
            return;
        };

        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(room_id, error = %err, "failed to serialize outbound message");
                return;
            }
        };

        // Closed writers are pruned lazily here; the socket handler also
        // removes itself on disconnect.
        room.retain(|_, tx| tx.send(Message::Text(payload.clone().into())).is_ok());
    }
}
