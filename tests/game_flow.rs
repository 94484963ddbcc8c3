//! End-to-end game flow tests driving the engine through a recording notifier.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mingle_back::{
    config::AppConfig,
    dto::{
        room::RoomSnapshot,
        ws::{ParticipantInput, ServerMessage},
    },
    services::{events, gateway::RoomNotifier, round_engine, submissions},
    state::{AppState, SharedState},
};
use serde_json::Value;

/// Notifier that records every published event instead of hitting sockets.
#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<(String, ServerMessage)>>,
}

impl RoomNotifier for RecordingNotifier {
    fn publish(&self, room_id: &str, message: &ServerMessage) {
        self.events
            .lock()
            .unwrap()
            .push((room_id.to_string(), message.clone()));
    }
}

impl RecordingNotifier {
    fn events(&self) -> Vec<(String, ServerMessage)> {
        self.events.lock().unwrap().clone()
    }

    fn room_updates(&self, room_id: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|(id, _)| id == room_id)
            .filter_map(|(_, message)| match message {
                ServerMessage::RoomUpdate { room } => serde_json::to_value(room).ok(),
                _ => None,
            })
            .collect()
    }

    fn last_snapshot(&self, room_id: &str) -> Option<RoomSnapshot> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|(id, message)| match message {
                ServerMessage::RoomUpdate { room } if id == room_id => Some(room),
                _ => None,
            })
    }

    fn game_started_count(&self, room_id: &str) -> usize {
        self.events()
            .iter()
            .filter(|(id, message)| id == room_id && matches!(message, ServerMessage::GameStarted))
            .count()
    }

    fn round_completed_count(&self, room_id: &str) -> usize {
        self.events()
            .iter()
            .filter(|(id, message)| {
                id == room_id && matches!(message, ServerMessage::RoundCompleted)
            })
            .count()
    }
}

fn test_state() -> (SharedState, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(AppConfig::default(), notifier.clone());
    (state, notifier)
}

async fn join(state: &SharedState, room_id: &str, id: &str, name: &str) {
    round_engine::join_room(
        state,
        room_id,
        ParticipantInput {
            id: id.to_string(),
            name: name.to_string(),
        },
    )
    .await;
}

/// Poll `pred` while virtual time advances, panicking if it never holds.
async fn wait_until(notifier: &RecordingNotifier, what: &str, pred: impl Fn(&RecordingNotifier) -> bool) {
    for _ in 0..20_000 {
        if pred(notifier) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    panic!("timed out waiting for: {what}");
}

fn snapshot_in_state<'a>(updates: &'a [Value], game_state: &str) -> Option<&'a Value> {
    updates
        .iter()
        .find(|snapshot| snapshot["gameState"] == game_state)
}

#[tokio::test(start_paused = true)]
async fn two_player_game_runs_to_results_on_timers_alone() {
    let (state, notifier) = test_state();
    join(&state, "travel-123", "u1", "Ana").await;
    join(&state, "travel-123", "u2", "Ben").await;
    round_engine::start_game(&state, "travel-123").await.unwrap();

    // Round 1 draws from the travel bank because of the room id.
    let first_round = notifier.last_snapshot("travel-123").unwrap();
    assert_eq!(first_round.game_state, "round-1");
    let first_round = serde_json::to_value(first_round).unwrap();
    assert_eq!(
        first_round["roundData"]["question"],
        "What is the number one destination on your bucket list?"
    );
    assert_eq!(first_round["roundData"]["questionCount"], 1);

    wait_until(&notifier, "results", |n| {
        n.last_snapshot("travel-123")
            .is_some_and(|room| room.game_state == "results")
    })
    .await;

    let updates = notifier.room_updates("travel-123");

    // All five question instances were played.
    let max_question = updates
        .iter()
        .filter_map(|s| s["roundData"]["questionCount"].as_u64())
        .max();
    assert_eq!(max_question, Some(5));

    // Rounds 2 and 3 happened, and round 3 paired both players symmetrically.
    assert!(snapshot_in_state(&updates, "round-2").is_some());
    let blind = snapshot_in_state(&updates, "round-3").unwrap();
    let partners = blind["roundData"]["partners"].as_object().unwrap();
    assert_eq!(partners.len(), 2);
    assert_eq!(partners[partners["u1"].as_str().unwrap()], "u1");

    // Voting opened with exactly the three injected bot captions.
    let voting = updates
        .iter()
        .find(|s| s["roundData"]["phase"] == "voting")
        .unwrap();
    let captions = voting["roundData"]["captions"].as_array().unwrap();
    assert_eq!(captions.len(), 3);
    for (i, caption) in captions.iter().enumerate() {
        assert_eq!(caption["userId"], format!("bot-{i}"));
    }

    // Every round entry announced itself: five question instances plus
    // rounds 2, 3, and 4 (the voting flip and finalization do not).
    assert_eq!(notifier.game_started_count("travel-123"), 8);

    // Finalization produced C(2,2)=1 match and a two-row leaderboard.
    let results = notifier.last_snapshot("travel-123").unwrap();
    assert_eq!(results.matches.len(), 1);
    assert!((70..=100).contains(&results.matches[0].score));
    assert_eq!(results.leaderboard.len(), 2);
    // Nobody submitted anything, so no points were awarded.
    assert!(results.leaderboard.iter().all(|row| row.score == 0));
}

#[tokio::test(start_paused = true)]
async fn all_submitted_completes_a_question_before_the_timer() {
    let (state, notifier) = test_state();
    join(&state, "room-1", "u1", "Ana").await;
    join(&state, "room-1", "u2", "Ben").await;
    round_engine::start_game(&state, "room-1").await.unwrap();

    let started = tokio::time::Instant::now();
    submissions::submit_round(&state, "room-1", "u1", "Tea".into())
        .await
        .unwrap();
    submissions::submit_round(&state, "room-1", "u2", "Coffee".into())
        .await
        .unwrap();

    wait_until(&notifier, "second question", |n| {
        n.room_updates("room-1")
            .iter()
            .any(|s| s["roundData"]["questionCount"] == 2)
    })
    .await;

    // Completion came from the submissions, well before the 30s expiry.
    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(notifier.round_completed_count("room-1") >= 1);

    let snapshot = notifier.last_snapshot("room-1").unwrap();
    assert_eq!(snapshot.scores["u1"], 10);
    assert_eq!(snapshot.scores["u2"], 10);
}

#[tokio::test(start_paused = true)]
async fn duplicate_submission_neither_scores_nor_completes() {
    let (state, notifier) = test_state();
    join(&state, "room-1", "u1", "Ana").await;
    join(&state, "room-1", "u2", "Ben").await;
    round_engine::start_game(&state, "room-1").await.unwrap();

    submissions::submit_round(&state, "room-1", "u1", "Tea".into())
        .await
        .unwrap();
    submissions::submit_round(&state, "room-1", "u1", "Coffee".into())
        .await
        .unwrap();

    let snapshot = notifier.last_snapshot("room-1").unwrap();
    assert_eq!(snapshot.scores["u1"], 10);
    let snapshot = serde_json::to_value(snapshot).unwrap();
    assert_eq!(snapshot["roundData"]["responses"]["u1"], "Tea");
    assert_eq!(notifier.round_completed_count("room-1"), 0);
}

#[tokio::test(start_paused = true)]
async fn lone_submission_arms_the_fallback_timer() {
    let (state, notifier) = test_state();
    join(&state, "room-1", "u1", "Ana").await;
    join(&state, "room-1", "u2", "Ben").await;
    round_engine::start_game(&state, "room-1").await.unwrap();

    // Knock out the round timer to reproduce the no-timer edge.
    state.timers().cancel("room-1");
    submissions::submit_round(&state, "room-1", "u1", "Tea".into())
        .await
        .unwrap();
    assert!(state.timers().is_active("room-1"));

    let started = tokio::time::Instant::now();
    wait_until(&notifier, "fallback completion", |n| {
        n.round_completed_count("room-1") >= 1
    })
    .await;
    // The 5s fallback fired, not a fresh 30s countdown.
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn five_participants_pair_into_two_pairs() {
    let (state, notifier) = test_state();
    for i in 0..5 {
        join(&state, "big-room", &format!("u{i}"), &format!("User {i}")).await;
    }
    round_engine::begin_round(&state, "big-room", 3).await;

    let snapshot = serde_json::to_value(notifier.last_snapshot("big-room").unwrap()).unwrap();
    assert_eq!(snapshot["gameState"], "round-3");
    let partners = snapshot["roundData"]["partners"].as_object().unwrap();
    assert_eq!(partners.len(), 4);
    for (a, b) in partners {
        let b = b.as_str().unwrap();
        assert_eq!(partners[b], *a);
    }
}

#[tokio::test(start_paused = true)]
async fn restarting_a_finished_game_keeps_players_and_scores() {
    let (state, notifier) = test_state();
    join(&state, "room-1", "u1", "Ana").await;
    join(&state, "room-1", "u2", "Ben").await;
    round_engine::start_game(&state, "room-1").await.unwrap();
    submissions::submit_round(&state, "room-1", "u1", "Tea".into())
        .await
        .unwrap();

    // Jump past the last round to force finalization.
    round_engine::begin_round(&state, "room-1", 5).await;
    let finished = notifier.last_snapshot("room-1").unwrap();
    assert_eq!(finished.game_state, "results");
    assert_eq!(finished.matches.len(), 1);

    round_engine::start_game(&state, "room-1").await.unwrap();
    let restarted = notifier.last_snapshot("room-1").unwrap();
    assert_eq!(restarted.game_state, "round-1");
    assert!(restarted.matches.is_empty());
    assert!(restarted.leaderboard.is_empty());
    assert_eq!(restarted.users.len(), 2);
    // Earlier points survive the restart.
    assert_eq!(restarted.scores["u1"], 10);
}

#[tokio::test(start_paused = true)]
async fn explicit_round_completed_matches_timer_expiry() {
    let (state, notifier) = test_state();
    join(&state, "room-1", "u1", "Ana").await;
    round_engine::start_game(&state, "room-1").await.unwrap();

    round_engine::complete_round(&state, "room-1").await.unwrap();
    wait_until(&notifier, "second question", |n| {
        n.room_updates("room-1")
            .iter()
            .any(|s| s["roundData"]["questionCount"] == 2)
    })
    .await;
    assert!(notifier.round_completed_count("room-1") >= 1);
    // Both question instances announced themselves.
    assert_eq!(notifier.game_started_count("room-1"), 2);
}

#[tokio::test(start_paused = true)]
async fn late_caption_during_voting_cannot_stall_finalization() {
    let (state, notifier) = test_state();
    join(&state, "room-1", "u1", "Ana").await;
    join(&state, "room-1", "u2", "Ben").await;
    round_engine::begin_round(&state, "room-1", 4).await;

    submissions::submit_round(&state, "room-1", "u1", "works first try".into())
        .await
        .unwrap();

    wait_until(&notifier, "voting opens", |n| {
        n.room_updates("room-1")
            .iter()
            .any(|s| s["roundData"]["phase"] == "voting")
    })
    .await;

    // The second caption arrives after the flip; it must neither score nor
    // count toward completion, and the voting countdown must survive it.
    submissions::submit_round(&state, "room-1", "u2", "too late".into())
        .await
        .unwrap();
    assert!(state.timers().is_active("room-1"));

    wait_until(&notifier, "results", |n| {
        n.last_snapshot("room-1")
            .is_some_and(|room| room.game_state == "results")
    })
    .await;

    let results = notifier.last_snapshot("room-1").unwrap();
    assert_eq!(results.scores["u1"], 10);
    assert_eq!(results.scores["u2"], 0);
}

#[tokio::test(start_paused = true)]
async fn unknown_rooms_are_rejected_but_harmless() {
    let (state, notifier) = test_state();
    assert!(round_engine::start_game(&state, "ghost").await.is_err());
    assert!(
        submissions::submit_round(&state, "ghost", "u1", "hi".into())
            .await
            .is_err()
    );
    assert!(round_engine::complete_round(&state, "ghost").await.is_err());
    assert!(notifier.events().is_empty());
    assert_eq!(state.room_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn chat_messages_relay_without_touching_state() {
    let (state, notifier) = test_state();
    join(&state, "room-1", "u1", "Ana").await;

    events::broadcast_new_message(
        &state,
        "room-1",
        ParticipantInput {
            id: "u1".into(),
            name: "Ana".into(),
        },
        "hello room".into(),
    );

    let relayed = notifier.events().into_iter().any(|(id, message)| {
        id == "room-1"
            && matches!(
                &message,
                ServerMessage::NewMessage { user, message, timestamp }
                    if user.id == "u1" && message.as_str() == "hello room" && !timestamp.is_empty()
            )
    });
    assert!(relayed);
    assert_eq!(
        notifier.last_snapshot("room-1").unwrap().game_state,
        "lobby"
    );
}
