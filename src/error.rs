//! Error taxonomy shared by the engine services and the transport layer.

use thiserror::Error;

/// Errors that can occur in service layer operations.
///
/// The engine favours availability: callers at the gateway boundary log
/// these and keep the connection alive rather than propagating a failure to
/// the room.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Operation referenced a room that was never created.
    #[error("room `{0}` not found")]
    RoomNotFound(String),
    /// Inbound frame failed to parse or validate.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::InvalidMessage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::InvalidMessage(format!("validation failed: {err}"))
    }
}
