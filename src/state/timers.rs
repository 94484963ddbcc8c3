use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::task::AbortHandle;

/// Registry of the active countdown task per room.
///
/// The map is keyed by room id, so at most one timer can exist per room by
/// construction; registering a new one always cancels the previous task
/// first. Every timer carries a generation stamp that its task re-validates
/// before firing, which closes the window between an abort request and the
/// task actually stopping.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    active: DashMap<String, ActiveTimer>,
    generations: AtomicU64,
}

#[derive(Debug)]
struct ActiveTimer {
    generation: u64,
    handle: AbortHandle,
}

impl TimerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh generation stamp for a timer about to start.
    pub fn next_generation(&self) -> u64 {
        self.generations.fetch_add(1, Ordering::Relaxed)
    }

    /// Register the task driving a room's countdown, cancelling any prior one.
    pub fn register(&self, room_id: &str, generation: u64, handle: AbortHandle) {
        if let Some(previous) = self
            .active
            .insert(room_id.to_string(), ActiveTimer { generation, handle })
        {
            previous.handle.abort();
        }
    }

    /// Cancel the room's timer if one is running. Idempotent.
    pub fn cancel(&self, room_id: &str) {
        if let Some((_, timer)) = self.active.remove(room_id) {
            timer.handle.abort();
        }
    }

    /// Whether any timer is currently registered for the room.
    pub fn is_active(&self, room_id: &str) -> bool {
        self.active.contains_key(room_id)
    }

    /// Whether the registered timer still carries the given generation.
    pub fn matches(&self, room_id: &str, generation: u64) -> bool {
        self.active
            .get(room_id)
            .is_some_and(|timer| timer.generation == generation)
    }

    /// Remove the room's entry if it still carries the given generation.
    ///
    /// Used by an expiring task to retire itself; returns `false` when a
    /// newer timer already replaced it, in which case the expiry must be
    /// dropped.
    pub fn clear_if(&self, room_id: &str, generation: u64) -> bool {
        self.active
            .remove_if(room_id, |_, timer| timer.generation == generation)
            .is_some()
    }
}
