//! Shared in-memory state: the room registry, timers, and injected notifier.

/// Room, participant, and round domain types.
pub mod room;
/// Phase enums and the trigger transition table.
pub mod state_machine;
/// Generation-stamped per-room timer registry.
pub mod timers;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::{
    catalog::Catalog,
    config::AppConfig,
    error::ServiceError,
    services::gateway::RoomNotifier,
    state::{room::Room, timers::TimerRegistry},
};

/// Cheaply cloneable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state owning every room and the per-room timers.
///
/// All state is ephemeral: it is created at engine construction and torn
/// down with the process; nothing survives a restart.
pub struct AppState {
    config: AppConfig,
    catalog: Catalog,
    rooms: DashMap<String, Arc<Mutex<Room>>>,
    timers: TimerRegistry,
    notifier: Arc<dyn RoomNotifier>,
}

impl AppState {
    /// Construct the shared state with the outbound notifier to fan events through.
    pub fn new(config: AppConfig, notifier: Arc<dyn RoomNotifier>) -> SharedState {
        Arc::new(Self {
            config,
            catalog: Catalog::builtin(),
            rooms: DashMap::new(),
            timers: TimerRegistry::new(),
            notifier,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Immutable content catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Per-room timer registry.
    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Outbound event gateway.
    pub fn notifier(&self) -> &dyn RoomNotifier {
        self.notifier.as_ref()
    }

    /// Return the room for `id`, creating it in the lobby phase on first use.
    pub fn ensure_room(&self, id: &str) -> Arc<Mutex<Room>> {
        self.rooms
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Room::new(id))))
            .clone()
    }

    /// Return the room for `id`, or a [`ServiceError::RoomNotFound`].
    pub fn room(&self, id: &str) -> Result<Arc<Mutex<Room>>, ServiceError> {
        self.rooms
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| ServiceError::RoomNotFound(id.to_string()))
    }

    /// Number of rooms currently held in memory.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
