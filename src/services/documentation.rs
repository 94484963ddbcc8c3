use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Mingle Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::ws::ClientMessage,
            crate::dto::ws::ServerMessage,
            crate::dto::ws::ParticipantInput,
            crate::dto::room::RoomSnapshot,
            crate::dto::room::RoundSnapshot,
            crate::dto::room::ParticipantSummary,
            crate::dto::room::CaptionSnapshot,
            crate::dto::room::MatchSummary,
            crate::dto::room::LeaderboardRow,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "WebSocket operations for game clients"),
    )
)]
pub struct ApiDoc;
