//! Round lifecycle engine: phase transitions, round setup, and bot simulation.

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::dto::ws::ParticipantInput;
use crate::error::ServiceError;
use crate::services::{events, matching, timer};
use crate::services::timer::TimerKind;
use crate::state::SharedState;
use crate::state::room::{Caption, Participant, Room, RoundData};
use crate::state::state_machine::{
    self, MemePhase, RoomPhase, RoundPhase, RoundStep, RoundTrigger,
};

const LAST_ROUND: u8 = 4;
const BLIND_CHAT_PROMPT: &str = "Blind Chat: You are paired anonymously!";

/// Add a participant to a room, creating the room on first join.
pub async fn join_room(state: &SharedState, room_id: &str, user: ParticipantInput) {
    let room = state.ensure_room(room_id);
    let mut room = room.lock().await;
    let added = room.add_participant(Participant {
        id: user.id,
        name: user.name,
    });
    if added {
        info!(room_id, participants = room.participants.len(), "participant joined");
    }
    events::broadcast_room_state(state, &room);
}

/// Start (or restart) a game in an existing room.
///
/// Round progress from a previous game is discarded but participants and
/// their accumulated scores carry over.
pub async fn start_game(state: &SharedState, room_id: &str) -> Result<(), ServiceError> {
    let room = state.room(room_id)?;
    state.timers().cancel(room_id);
    let mut room = room.lock().await;
    room.reset_for_new_game();
    info!(room_id, "game starting");
    apply_begin_round(state, &mut room, 1);
    Ok(())
}

/// Client-signalled completion of the current round instance.
pub async fn complete_round(state: &SharedState, room_id: &str) -> Result<(), ServiceError> {
    state.room(room_id)?;
    handle_trigger(state, room_id, RoundTrigger::ClientCompleted).await;
    Ok(())
}

/// Resolve a trigger against the room's phase and perform the resulting step.
///
/// All timer expiries, debounces, all-submitted detections, and client
/// completions converge here, so the transition table is the single place
/// deciding how a room moves forward. Resolution and mutation happen under
/// one room lock: a trigger racing in from another task can never apply a
/// step computed against a phase that has since changed.
pub async fn handle_trigger(state: &SharedState, room_id: &str, trigger: RoundTrigger) {
    let room = match state.room(room_id) {
        Ok(room) => room,
        Err(err) => {
            debug!(room_id, ?trigger, error = %err, "trigger for unknown room dropped");
            return;
        }
    };

    let mut room = room.lock().await;
    let step = state_machine::next_step(&room.phase, trigger, state.config());
    debug!(room_id, ?trigger, ?step, "resolved trigger");

    match step {
        RoundStep::Ignore => {}
        RoundStep::Complete => {
            state.timers().cancel(room_id);
            events::broadcast_round_completed(state, room_id);
            timer::schedule_delay(
                state,
                room_id,
                state.config().advance_delay,
                RoundTrigger::DebounceElapsed,
            );
        }
        RoundStep::NextQuestion => {
            let next = match &room.phase {
                RoomPhase::Round(RoundPhase::Questions { question_no }) => question_no + 1,
                _ => return,
            };
            apply_question_instance(state, &mut room, next);
        }
        RoundStep::BeginRound(number) => apply_begin_round(state, &mut room, number),
        RoundStep::OpenVoting => apply_open_voting(state, &mut room),
        RoundStep::Finalize => apply_finish(state, &mut room),
    }
}

/// Enter the given round, or finalize the game when the last round is done.
pub async fn begin_round(state: &SharedState, room_id: &str, number: u8) {
    let Ok(room) = state.room(room_id) else {
        return;
    };
    let mut room = room.lock().await;
    apply_begin_round(state, &mut room, number);
}

fn apply_begin_round(state: &SharedState, room: &mut Room, number: u8) {
    if number > LAST_ROUND {
        apply_finish(state, room);
        return;
    }
    if number == 1 {
        apply_question_instance(state, room, 1);
        return;
    }

    let seconds = match number {
        2 => {
            setup_team_task(room, state.catalog());
            state.config().team_task_seconds
        }
        3 => {
            setup_blind_pairing(room);
            state.config().blind_chat_seconds
        }
        _ => {
            setup_captioning(room, state.catalog());
            state.config().caption_seconds
        }
    };
    info!(room_id = %room.id, round = number, "round started");
    events::broadcast_room_state(state, room);
    events::broadcast_game_started(state, &room.id);
    timer::schedule_countdown(
        state,
        &room.id,
        seconds,
        TimerKind::Countdown,
        RoundTrigger::TimerExpired,
    );
}

/// Present a round-1 question instance with a fresh submission map.
fn apply_question_instance(state: &SharedState, room: &mut Room, question_no: u8) {
    setup_questions(room, state.catalog(), question_no);
    debug!(room_id = %room.id, question_no, "question instance started");
    events::broadcast_room_state(state, room);
    events::broadcast_game_started(state, &room.id);
    timer::schedule_countdown(
        state,
        &room.id,
        state.config().question_seconds,
        TimerKind::Countdown,
        RoundTrigger::TimerExpired,
    );
}

/// Lock captions, append the bot entries, and open the voting countdown.
fn apply_open_voting(state: &SharedState, room: &mut Room) {
    if room.phase != RoomPhase::Round(RoundPhase::Meme(MemePhase::Captioning)) {
        return;
    }
    state.timers().cancel(&room.id);
    room.phase = RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting));
    if let RoundData::Meme { captions, .. } = &mut room.round {
        let picked = {
            let mut rng = rand::rng();
            state
                .catalog()
                .sample_bot_captions(&mut rng, state.config().bot_caption_count)
        };
        for (i, text) in picked.into_iter().enumerate() {
            captions.push(Caption {
                author_id: format!("bot-{i}"),
                text: text.to_string(),
                reactions: IndexMap::new(),
            });
        }
    }
    info!(room_id = %room.id, "voting opened");
    events::broadcast_room_state(state, room);
    timer::schedule_countdown(
        state,
        &room.id,
        state.config().voting_seconds,
        TimerKind::VotingCountdown,
        RoundTrigger::TimerExpired,
    );
}

/// Compute the matches and leaderboard and move the room to the results phase.
fn apply_finish(state: &SharedState, room: &mut Room) {
    state.timers().cancel(&room.id);
    let captions: &[Caption] = match &room.round {
        RoundData::Meme { captions, .. } => captions,
        _ => &[],
    };
    let (matches, leaderboard) = matching::compute(&room.participants, &room.scores, captions);
    room.matches = matches;
    room.leaderboard = leaderboard;
    room.phase = RoomPhase::Results;
    info!(room_id = %room.id, matches = room.matches.len(), "game finished");
    events::broadcast_room_state(state, room);
}

/// One voting tick's worth of simulated audience: with the configured
/// probability, a synthetic reactor drops a reaction on a random caption.
pub(crate) async fn simulate_bot_reaction(state: &SharedState, room_id: &str) {
    let Ok(room) = state.room(room_id) else {
        return;
    };
    let mut room = room.lock().await;
    if room.phase != RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting)) {
        return;
    }
    let RoundData::Meme { captions, .. } = &mut room.round else {
        return;
    };
    if captions.is_empty() {
        return;
    }

    let reacted = {
        let mut rng = rand::rng();
        if rng.random_bool(state.config().reaction_probability) {
            let index = rng.random_range(0..captions.len());
            let reactor = format!(
                "bot-reactor-{}",
                rng.random_range(0..state.config().bot_reactor_pool)
            );
            let symbol = state.catalog().random_reaction(&mut rng);
            captions[index].reactions.insert(reactor, symbol.to_string());
            true
        } else {
            false
        }
    };
    if reacted {
        events::broadcast_room_state(state, &room);
    }
}

fn setup_questions(room: &mut Room, catalog: &Catalog, question_no: u8) {
    room.phase = RoomPhase::Round(RoundPhase::Questions { question_no });
    let category = catalog.category_for_room(&room.id);
    let question = catalog.question_for_instance(category, question_no);
    room.round = RoundData::Questions {
        question: question.to_string(),
        responses: IndexMap::new(),
    };
}

fn setup_team_task(room: &mut Room, catalog: &Catalog) {
    room.phase = RoomPhase::Round(RoundPhase::TeamTask);
    let mut rng = rand::rng();
    room.round = RoundData::TeamTask {
        prompt: catalog.random_team_prompt(&mut rng).to_string(),
        responses: IndexMap::new(),
    };
}

fn setup_blind_pairing(room: &mut Room) {
    room.phase = RoomPhase::Round(RoundPhase::BlindPairing);
    let mut rng = rand::rng();
    let partners = pair_participants(&room.participants, &mut rng);
    room.round = RoundData::BlindPairing {
        prompt: BLIND_CHAT_PROMPT.to_string(),
        partners,
    };
}

fn setup_captioning(room: &mut Room, catalog: &Catalog) {
    room.phase = RoomPhase::Round(RoundPhase::Meme(MemePhase::Captioning));
    let mut rng = rand::rng();
    room.round = RoundData::Meme {
        meme_url: catalog.random_meme(&mut rng).to_string(),
        captions: Vec::new(),
        responses: IndexMap::new(),
    };
}

/// Shuffle the participants and pair consecutive entries.
///
/// The map is symmetric (if A maps to B then B maps to A); with an odd
/// participant count exactly one participant stays unpaired.
pub fn pair_participants(
    participants: &[Participant],
    rng: &mut impl Rng,
) -> IndexMap<String, String> {
    let mut order: Vec<&Participant> = participants.iter().collect();
    order.shuffle(rng);
    let mut partners = IndexMap::new();
    for pair in order.chunks_exact(2) {
        partners.insert(pair[0].id.clone(), pair[1].id.clone());
        partners.insert(pair[1].id.clone(), pair[0].id.clone());
    }
    partners
}
