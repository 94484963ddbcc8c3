use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness together with the number of in-memory rooms.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.room_count())
}
