//! Per-connection WebSocket lifecycle: frame parsing and event dispatch.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::ClientMessage,
    services::{events, gateway::WsHub, round_engine, submissions},
    state::SharedState,
};

/// Handle the full lifecycle of one game WebSocket connection.
pub async fn handle_socket(state: SharedState, hub: Arc<WsHub>, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let connection_id = Uuid::new_v4();
    let mut joined_rooms: HashSet<String> = HashSet::new();
    info!(%connection_id, "client connected");

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => match ClientMessage::from_json_str(&text) {
                Ok(inbound) => {
                    dispatch(&state, &hub, connection_id, &outbound_tx, &mut joined_rooms, inbound)
                        .await;
                }
                Err(err) => {
                    warn!(%connection_id, error = %err, "failed to parse or validate client message");
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(%connection_id, "client closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(%connection_id, error = %err, "websocket error");
                break;
            }
        }
    }

    for room_id in &joined_rooms {
        hub.leave(room_id, &connection_id);
    }
    info!(%connection_id, "client disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Route one parsed client message into the engine.
///
/// Engine-side lookup failures never terminate the connection; the engine
/// favours resilience over strict request validation, so they are logged and
/// the frame is dropped.
async fn dispatch(
    state: &SharedState,
    hub: &Arc<WsHub>,
    connection_id: Uuid,
    outbound_tx: &mpsc::UnboundedSender<Message>,
    joined_rooms: &mut HashSet<String>,
    inbound: ClientMessage,
) {
    match inbound {
        ClientMessage::JoinRoom { room_id, user } => {
            hub.join(&room_id, connection_id, outbound_tx.clone());
            joined_rooms.insert(room_id.clone());
            round_engine::join_room(state, &room_id, user).await;
        }
        ClientMessage::StartGame { room_id } => {
            if let Err(err) = round_engine::start_game(state, &room_id).await {
                debug!(%connection_id, room_id, error = %err, "start-game dropped");
            }
        }
        ClientMessage::SubmitRound {
            room_id,
            user_id,
            response,
        } => {
            if let Err(err) = submissions::submit_round(state, &room_id, &user_id, response).await {
                debug!(%connection_id, room_id, error = %err, "submit-round dropped");
            }
        }
        ClientMessage::RoundCompleted { room_id } => {
            if let Err(err) = round_engine::complete_round(state, &room_id).await {
                debug!(%connection_id, room_id, error = %err, "round-completed dropped");
            }
        }
        ClientMessage::SendMessage {
            room_id,
            message,
            user,
        } => {
            events::broadcast_new_message(state, &room_id, user, message);
        }
        ClientMessage::Unknown => {
            debug!(%connection_id, "ignoring unknown message type");
        }
    }
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
