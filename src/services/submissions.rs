//! Submission intake: response storage, scoring, and completion detection.

use tracing::debug;

use crate::error::ServiceError;
use crate::services::{events, timer};
use crate::services::timer::TimerKind;
use crate::state::SharedState;
use crate::state::room::Room;
use crate::state::state_machine::{MemePhase, RoomPhase, RoundPhase, RoundTrigger};

/// Points awarded for each accepted submission.
const SUBMISSION_POINTS: u32 = 10;

/// What happened to a single submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Stored and scored.
    Accepted {
        /// Every participant has now submitted for this instance.
        all_submitted: bool,
        /// This was the first submission of the instance.
        first: bool,
    },
    /// The participant already submitted this instance; ignored.
    Duplicate,
    /// The active round does not collect responses; ignored.
    NotCollecting,
    /// The submitter is not a member of the room; ignored.
    UnknownParticipant,
}

/// Record one submission against the room's active round.
///
/// First submission per participant per round-instance wins; everything else
/// is a silent no-op per the engine's resilience policy. Captions are locked
/// once voting opens, so the meme round stops collecting at the phase flip
/// even though its responses map is still present.
pub fn record_submission(
    room: &mut Room,
    participant_id: &str,
    response: String,
) -> SubmissionOutcome {
    if room.participant(participant_id).is_none() {
        return SubmissionOutcome::UnknownParticipant;
    }
    if room.phase == RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting)) {
        return SubmissionOutcome::NotCollecting;
    }
    let Some(responses) = room.round.responses_mut() else {
        return SubmissionOutcome::NotCollecting;
    };
    if responses.contains_key(participant_id) {
        return SubmissionOutcome::Duplicate;
    }
    responses.insert(participant_id.to_string(), response);
    let first = responses.len() == 1;
    *room.scores.entry(participant_id.to_string()).or_insert(0) += SUBMISSION_POINTS;
    SubmissionOutcome::Accepted {
        all_submitted: room.all_submitted(),
        first,
    }
}

/// Handle a participant's round submission end to end.
///
/// On all-submitted the round timer is superseded: the completion signal goes
/// out immediately and the short completion delay drives the actual phase
/// change. A lone first submission with no timer running arms the fallback
/// countdown so a single responder is never stuck (round 2 excepted, where
/// the team timer is authoritative).
pub async fn submit_round(
    state: &SharedState,
    room_id: &str,
    user_id: &str,
    response: String,
) -> Result<(), ServiceError> {
    let room = state.room(room_id)?;
    let (outcome, current_round) = {
        let mut room = room.lock().await;
        let outcome = record_submission(&mut room, user_id, response);
        if !matches!(outcome, SubmissionOutcome::Accepted { all_submitted: true, .. }) {
            events::broadcast_room_state(state, &room);
        }
        (outcome, room.phase.current_round())
    };
    debug!(room_id, user_id, ?outcome, "submission processed");

    match outcome {
        SubmissionOutcome::Accepted { all_submitted: true, .. } => {
            events::broadcast_round_completed(state, room_id);
            timer::schedule_delay(
                state,
                room_id,
                state.config().completion_delay,
                RoundTrigger::AllSubmitted,
            );
        }
        SubmissionOutcome::Accepted { first: true, .. }
            if current_round != 2 && !state.timers().is_active(room_id) =>
        {
            timer::schedule_countdown(
                state,
                room_id,
                state.config().fallback_seconds,
                TimerKind::Countdown,
                RoundTrigger::TimerExpired,
            );
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::state::room::{Participant, RoundData};

    fn room_with_players(count: usize) -> Room {
        let mut room = Room::new("room");
        for i in 0..count {
            room.add_participant(Participant {
                id: format!("u{i}"),
                name: format!("User {i}"),
            });
        }
        room.round = RoundData::Questions {
            question: "Coffee or Tea?".into(),
            responses: IndexMap::new(),
        };
        room
    }

    #[test]
    fn first_submission_scores_ten_points() {
        let mut room = room_with_players(2);
        let outcome = record_submission(&mut room, "u0", "Tea".into());
        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                all_submitted: false,
                first: true,
            }
        );
        assert_eq!(room.scores["u0"], 10);
    }

    #[test]
    fn duplicate_submission_is_ignored() {
        let mut room = room_with_players(2);
        record_submission(&mut room, "u0", "Tea".into());
        let outcome = record_submission(&mut room, "u0", "Coffee".into());
        assert_eq!(outcome, SubmissionOutcome::Duplicate);
        assert_eq!(room.scores["u0"], 10);
        assert_eq!(room.round.responses().unwrap()["u0"], "Tea");
    }

    #[test]
    fn last_submission_reports_all_submitted() {
        let mut room = room_with_players(2);
        record_submission(&mut room, "u0", "Tea".into());
        let outcome = record_submission(&mut room, "u1", "Coffee".into());
        assert_eq!(
            outcome,
            SubmissionOutcome::Accepted {
                all_submitted: true,
                first: false,
            }
        );
    }

    #[test]
    fn non_collecting_rounds_reject_submissions() {
        let mut room = room_with_players(2);
        room.round = RoundData::BlindPairing {
            prompt: "paired".into(),
            partners: IndexMap::new(),
        };
        assert_eq!(
            record_submission(&mut room, "u0", "hello".into()),
            SubmissionOutcome::NotCollecting
        );
        assert!(room.scores["u0"] == 0);
    }

    #[test]
    fn voting_phase_stops_collecting_captions() {
        use crate::state::room::Caption;

        let mut room = room_with_players(2);
        room.phase = RoomPhase::Round(RoundPhase::Meme(MemePhase::Captioning));
        room.round = RoundData::Meme {
            meme_url: "https://i.imgflip.com/30b1gx.jpg".into(),
            captions: Vec::new(),
            responses: IndexMap::new(),
        };
        record_submission(&mut room, "u0", "first try".into());

        room.phase = RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting));
        if let RoundData::Meme { captions, .. } = &mut room.round {
            captions.push(Caption {
                author_id: "bot-0".into(),
                text: "late".into(),
                reactions: IndexMap::new(),
            });
        }

        // A caption after the flip must not score or count toward completion.
        assert_eq!(
            record_submission(&mut room, "u1", "too late".into()),
            SubmissionOutcome::NotCollecting
        );
        assert_eq!(room.scores["u1"], 0);
        assert_eq!(room.round.responses().unwrap().len(), 1);
        assert!(!room.all_submitted());
    }

    #[test]
    fn strangers_cannot_submit() {
        let mut room = room_with_players(1);
        assert_eq!(
            record_submission(&mut room, "ghost", "boo".into()),
            SubmissionOutcome::UnknownParticipant
        );
        assert!(room.round.responses().unwrap().is_empty());
    }
}
