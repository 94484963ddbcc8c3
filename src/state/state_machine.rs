use crate::config::AppConfig;

/// High-level phases a room can be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomPhase {
    /// Participants are gathering; no round is running.
    Lobby,
    /// One of the four rounds is active.
    Round(RoundPhase),
    /// Matches and leaderboard are displayed; terminal until a new game starts.
    Results,
}

/// Fine-grained phase while a round is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundPhase {
    /// Round 1: a sub-sequence of timed question instances.
    Questions {
        /// 1-based question instance counter, capped by the configured count.
        question_no: u8,
    },
    /// Round 2: one shared team task prompt.
    TeamTask,
    /// Round 3: anonymous partner chat; completion is timer-only.
    BlindPairing,
    /// Round 4: the two-phase meme caption-and-react battle.
    Meme(MemePhase),
}

/// Sub-phase of the round-4 meme battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemePhase {
    /// Participants write captions for the selected meme.
    Captioning,
    /// Captions are locked and reactions accumulate.
    Voting,
}

/// Events that drive a room forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTrigger {
    /// The active countdown reached zero.
    TimerExpired,
    /// Every participant submitted a response for the current instance.
    AllSubmitted,
    /// A client explicitly signalled round completion.
    ClientCompleted,
    /// The short advance debounce between instances elapsed.
    DebounceElapsed,
}

/// Action the engine performs in response to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    /// Cancel the timer, signal completion, and debounce before advancing.
    Complete,
    /// Re-enter round 1 with the next question instance.
    NextQuestion,
    /// Begin the numbered round (a number past the last round finalizes).
    BeginRound(u8),
    /// Lock captions, inject bots, and open the voting phase.
    OpenVoting,
    /// Compute matches and enter the results phase.
    Finalize,
    /// The trigger does not apply to the current phase.
    Ignore,
}

impl RoomPhase {
    /// Round number exposed to clients: 0 in the lobby, 1 to 4 during play.
    pub fn current_round(&self) -> u8 {
        match self {
            RoomPhase::Lobby => 0,
            RoomPhase::Round(RoundPhase::Questions { .. }) => 1,
            RoomPhase::Round(RoundPhase::TeamTask) => 2,
            RoomPhase::Round(RoundPhase::BlindPairing) => 3,
            RoomPhase::Round(RoundPhase::Meme(_)) => 4,
            RoomPhase::Results => 4,
        }
    }

    /// Wire label for the phase (`lobby`, `round-1`..`round-4`, `results`).
    pub fn game_state(&self) -> String {
        match self {
            RoomPhase::Lobby => "lobby".into(),
            RoomPhase::Round(_) => format!("round-{}", self.current_round()),
            RoomPhase::Results => "results".into(),
        }
    }
}

/// Compute the step to perform when `trigger` arrives while in `phase`.
///
/// This is the transition table that replaces nested timer callbacks: every
/// countdown expiry, all-submitted detection, client completion, and debounce
/// lands here and the result alone decides the mutation.
pub fn next_step(phase: &RoomPhase, trigger: RoundTrigger, config: &AppConfig) -> RoundStep {
    use RoundTrigger::*;

    match (phase, trigger) {
        (RoomPhase::Lobby, _) | (RoomPhase::Results, _) => RoundStep::Ignore,

        (RoomPhase::Round(RoundPhase::Questions { .. }), TimerExpired | AllSubmitted) => {
            RoundStep::Complete
        }
        (RoomPhase::Round(RoundPhase::Questions { .. }), ClientCompleted) => RoundStep::Complete,
        (RoomPhase::Round(RoundPhase::Questions { question_no }), DebounceElapsed) => {
            if *question_no < config.question_count {
                RoundStep::NextQuestion
            } else {
                RoundStep::BeginRound(2)
            }
        }

        (RoomPhase::Round(RoundPhase::TeamTask), TimerExpired | AllSubmitted | ClientCompleted) => {
            RoundStep::Complete
        }
        (RoomPhase::Round(RoundPhase::TeamTask), DebounceElapsed) => RoundStep::BeginRound(3),

        // Blind pairing has no submissions; the timer advances it directly.
        (RoomPhase::Round(RoundPhase::BlindPairing), TimerExpired) => RoundStep::BeginRound(4),
        (RoomPhase::Round(RoundPhase::BlindPairing), ClientCompleted) => RoundStep::Complete,
        (RoomPhase::Round(RoundPhase::BlindPairing), AllSubmitted) => RoundStep::Ignore,
        (RoomPhase::Round(RoundPhase::BlindPairing), DebounceElapsed) => RoundStep::BeginRound(4),

        (RoomPhase::Round(RoundPhase::Meme(MemePhase::Captioning)), TimerExpired) => {
            RoundStep::OpenVoting
        }
        (
            RoomPhase::Round(RoundPhase::Meme(MemePhase::Captioning)),
            AllSubmitted | ClientCompleted,
        ) => RoundStep::Complete,
        (RoomPhase::Round(RoundPhase::Meme(MemePhase::Captioning)), DebounceElapsed) => {
            RoundStep::OpenVoting
        }

        (RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting)), TimerExpired) => {
            RoundStep::Finalize
        }
        (RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting)), ClientCompleted) => {
            RoundStep::Complete
        }
        (RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting)), AllSubmitted) => RoundStep::Ignore,
        (RoomPhase::Round(RoundPhase::Meme(MemePhase::Voting)), DebounceElapsed) => {
            RoundStep::Finalize
        }
    }
}
