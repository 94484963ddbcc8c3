//! Helpers that build outbound payloads and hand them to the notifier.

use crate::dto::now_rfc3339;
use crate::dto::room::RoomSnapshot;
use crate::dto::ws::{ParticipantInput, ServerMessage};
use crate::state::SharedState;
use crate::state::room::Room;

/// Push a full snapshot of the room to everyone in it.
pub fn broadcast_room_state(state: &SharedState, room: &Room) {
    let message = ServerMessage::RoomUpdate {
        room: RoomSnapshot::from(room),
    };
    state.notifier().publish(&room.id, &message);
}

/// Announce the remaining seconds of the active countdown.
pub fn broadcast_timer(state: &SharedState, room_id: &str, seconds: u64) {
    state
        .notifier()
        .publish(room_id, &ServerMessage::TimerUpdate { seconds });
}

/// Announce that a new game has begun.
pub fn broadcast_game_started(state: &SharedState, room_id: &str) {
    state.notifier().publish(room_id, &ServerMessage::GameStarted);
}

/// Announce that the current round instance is complete.
pub fn broadcast_round_completed(state: &SharedState, room_id: &str) {
    state
        .notifier()
        .publish(room_id, &ServerMessage::RoundCompleted);
}

/// Relay a chat message to the room, stamped with the current time.
pub fn broadcast_new_message(state: &SharedState, room_id: &str, user: ParticipantInput, text: String) {
    let message = ServerMessage::NewMessage {
        user,
        message: text,
        timestamp: now_rfc3339(),
    };
    state.notifier().publish(room_id, &message);
}
