/// OpenAPI documentation generation.
pub mod documentation;
/// Outbound event construction and broadcasting.
pub mod events;
/// Notifier seam and the WebSocket multicast hub.
pub mod gateway;
/// Health check service.
pub mod health_service;
/// Final matching and leaderboard computation.
pub mod matching;
/// Round lifecycle orchestration and bot simulation.
pub mod round_engine;
/// Submission intake and completion detection.
pub mod submissions;
/// Countdown and delay scheduling.
pub mod timer;
/// WebSocket connection and message handling service.
pub mod websocket_service;
