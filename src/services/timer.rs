//! Countdown and delay scheduling on top of the generation-stamped registry.
//!
//! Every timed transition in the engine flows through these two entry points,
//! which guarantees at most one live timer per room: scheduling cancels
//! whatever ran before, and an expiring task retires itself with `clear_if`
//! before acting so a timer superseded mid-sleep fires nothing.

use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::services::{events, round_engine};
use crate::state::SharedState;
use crate::state::state_machine::RoundTrigger;

const TICK: Duration = Duration::from_secs(1);

/// What a countdown does on each tick besides announcing the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Plain countdown, ticks are timer updates only.
    Countdown,
    /// Voting countdown, each tick also gives the bots a chance to react.
    VotingCountdown,
}

/// Start a ticking countdown for a room, firing `trigger` when it reaches zero.
///
/// The initial remaining time is broadcast immediately so clients can render
/// the timer without waiting for the first tick.
pub fn schedule_countdown(
    state: &SharedState,
    room_id: &str,
    seconds: u64,
    kind: TimerKind,
    trigger: RoundTrigger,
) {
    state.timers().cancel(room_id);
    let generation = state.timers().next_generation();
    events::broadcast_timer(state, room_id, seconds);

    let task_state = state.clone();
    let task_room = room_id.to_string();
    let handle = tokio::spawn(async move {
        let mut remaining = seconds;
        loop {
            sleep(TICK).await;
            if !task_state.timers().matches(&task_room, generation) {
                return;
            }
            remaining = remaining.saturating_sub(1);
            events::broadcast_timer(&task_state, &task_room, remaining);
            if remaining == 0 {
                if task_state.timers().clear_if(&task_room, generation) {
                    debug!(room_id = %task_room, ?trigger, "countdown expired");
                    round_engine::handle_trigger(&task_state, &task_room, trigger).await;
                }
                return;
            }
            if kind == TimerKind::VotingCountdown {
                round_engine::simulate_bot_reaction(&task_state, &task_room).await;
            }
        }
    });
    state
        .timers()
        .register(room_id, generation, handle.abort_handle());
}

/// Fire `trigger` once after a silent delay, with no intermediate ticks.
pub fn schedule_delay(
    state: &SharedState,
    room_id: &str,
    delay: Duration,
    trigger: RoundTrigger,
) {
    state.timers().cancel(room_id);
    let generation = state.timers().next_generation();

    let task_state = state.clone();
    let task_room = room_id.to_string();
    let handle = tokio::spawn(async move {
        sleep(delay).await;
        if task_state.timers().clear_if(&task_room, generation) {
            debug!(room_id = %task_room, ?trigger, "delay elapsed");
            round_engine::handle_trigger(&task_state, &task_room, trigger).await;
        }
    });
    state
        .timers()
        .register(room_id, generation, handle.abort_handle());
}
