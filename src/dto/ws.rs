use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{dto::room::RoomSnapshot, error::ServiceError};

/// Participant identity supplied by the client on join.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct ParticipantInput {
    /// Stable identifier chosen by the client, kept across reconnects.
    #[validate(length(min = 1, max = 64))]
    pub id: String,
    /// Display name shown to the room.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Messages accepted from game WebSocket clients.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Join (and lazily create) a room.
    #[serde(rename = "join-room", rename_all = "camelCase")]
    JoinRoom {
        /// Target room identifier.
        room_id: String,
        /// Joining participant.
        user: ParticipantInput,
    },
    /// Start (or restart) the game in a room.
    #[serde(rename = "start-game", rename_all = "camelCase")]
    StartGame {
        /// Target room identifier.
        room_id: String,
    },
    /// Submit a response for the active round-instance.
    #[serde(rename = "submit-round", rename_all = "camelCase")]
    SubmitRound {
        /// Target room identifier.
        room_id: String,
        /// Submitting participant identifier.
        user_id: String,
        /// Free-form response content.
        response: String,
    },
    /// Explicit client-side round completion, equivalent to a timer expiry.
    #[serde(rename = "round-completed", rename_all = "camelCase")]
    RoundCompleted {
        /// Target room identifier.
        room_id: String,
    },
    /// Relay a chat message to the room; never touches game state.
    #[serde(rename = "send-message", rename_all = "camelCase")]
    SendMessage {
        /// Target room identifier.
        room_id: String,
        /// Chat message body.
        message: String,
        /// Sending participant.
        user: ParticipantInput,
    },
    /// Anything this build does not understand.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Parse and validate an inbound text frame.
    pub fn from_json_str(payload: &str) -> Result<Self, ServiceError> {
        let message: Self = serde_json::from_str(payload)?;
        match &message {
            ClientMessage::JoinRoom { user, .. } | ClientMessage::SendMessage { user, .. } => {
                user.validate()?;
            }
            _ => {}
        }
        Ok(message)
    }
}

/// Messages pushed to game WebSocket clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Full room snapshot after any state change.
    #[serde(rename = "room-update")]
    RoomUpdate {
        /// Serialized room state.
        room: RoomSnapshot,
    },
    /// Countdown tick for the active round timer.
    #[serde(rename = "timer-update")]
    TimerUpdate {
        /// Remaining seconds.
        seconds: u64,
    },
    /// A round (re)started in the room.
    #[serde(rename = "game-started")]
    GameStarted,
    /// The current round-instance completed.
    #[serde(rename = "round-completed")]
    RoundCompleted,
    /// Relayed chat message.
    #[serde(rename = "new-message")]
    NewMessage {
        /// Sending participant.
        user: ParticipantInput,
        /// Chat message body.
        message: String,
        /// RFC 3339 send timestamp.
        timestamp: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_room_round_trips_camel_case() {
        let frame = r#"{"type":"join-room","roomId":"travel-123","user":{"id":"u1","name":"Ana"}}"#;
        match ClientMessage::from_json_str(frame).unwrap() {
            ClientMessage::JoinRoom { room_id, user } => {
                assert_eq!(room_id, "travel-123");
                assert_eq!(user.id, "u1");
                assert_eq!(user.name, "Ana");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn empty_participant_name_is_rejected() {
        let frame = r#"{"type":"join-room","roomId":"travel-123","user":{"id":"u1","name":""}}"#;
        assert!(matches!(
            ClientMessage::from_json_str(frame),
            Err(ServiceError::InvalidMessage(_))
        ));
    }

    #[test]
    fn unknown_message_types_parse_as_unknown() {
        let frame = r#"{"type":"mystery","roomId":"x"}"#;
        assert!(matches!(
            ClientMessage::from_json_str(frame).unwrap(),
            ClientMessage::Unknown
        ));
    }

    #[test]
    fn server_messages_are_type_tagged() {
        let json = serde_json::to_value(ServerMessage::TimerUpdate { seconds: 30 }).unwrap();
        assert_eq!(json["type"], "timer-update");
        assert_eq!(json["seconds"], 30);

        let json = serde_json::to_value(ServerMessage::GameStarted).unwrap();
        assert_eq!(json["type"], "game-started");
    }
}
