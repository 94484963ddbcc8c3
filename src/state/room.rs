use indexmap::IndexMap;

use crate::state::state_machine::RoomPhase;

/// A human player inside a room. The identifier is stable across reconnects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Stable identifier chosen by the client.
    pub id: String,
    /// Display name shown to the rest of the room.
    pub name: String,
}

/// One caption on the round-4 meme, human- or bot-authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    /// Identifier of the author (participant id or synthetic `bot-n` id).
    pub author_id: String,
    /// Caption text.
    pub text: String,
    /// Reactor identifier mapped to the reaction symbol they picked.
    pub reactions: IndexMap<String, String>,
}

/// Round-specific payload attached to a room while a round is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundData {
    /// No payload (lobby or results).
    None,
    /// Round 1: the question shown and the responses gathered so far.
    Questions {
        /// Question text for the current instance.
        question: String,
        /// Participant id mapped to their accepted response.
        responses: IndexMap<String, String>,
    },
    /// Round 2: the shared team prompt and the responses gathered so far.
    TeamTask {
        /// Prompt drawn from the team-task pool.
        prompt: String,
        /// Participant id mapped to their accepted response.
        responses: IndexMap<String, String>,
    },
    /// Round 3: anonymous pairing; no responses are collected.
    BlindPairing {
        /// Banner prompt shown to the room.
        prompt: String,
        /// Symmetric partner map (if A → B then B → A).
        partners: IndexMap<String, String>,
    },
    /// Round 4: the meme under caption/vote and the caption submissions.
    Meme {
        /// URL of the meme template being captioned.
        meme_url: String,
        /// Ordered caption list; bots are appended when voting opens.
        captions: Vec<Caption>,
        /// Participant id mapped to their accepted caption text.
        responses: IndexMap<String, String>,
    },
}

impl RoundData {
    /// Mutable access to the submission map of rounds that collect responses.
    pub fn responses_mut(&mut self) -> Option<&mut IndexMap<String, String>> {
        match self {
            RoundData::Questions { responses, .. }
            | RoundData::TeamTask { responses, .. }
            | RoundData::Meme { responses, .. } => Some(responses),
            RoundData::None | RoundData::BlindPairing { .. } => None,
        }
    }

    /// Read access to the submission map, when the round collects responses.
    pub fn responses(&self) -> Option<&IndexMap<String, String>> {
        match self {
            RoundData::Questions { responses, .. }
            | RoundData::TeamTask { responses, .. }
            | RoundData::Meme { responses, .. } => Some(responses),
            RoundData::None | RoundData::BlindPairing { .. } => None,
        }
    }
}

/// A computed compatibility match between two participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// First participant of the pair, in original enumeration order.
    pub user1: Participant,
    /// Second participant of the pair.
    pub user2: Participant,
    /// Final compatibility score, always within [70, 100].
    pub score: u32,
    /// Decorative tags; `Humor Match 😂` when the humor bonus exceeds 20.
    pub tags: Vec<String>,
}

/// One row of the final leaderboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Participant identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Accumulated round score.
    pub score: u32,
}

/// One isolated game session: participants, round state, and scores.
///
/// A room is owned by the registry and only ever mutated under its own lock,
/// so all fields can stay plain data.
#[derive(Debug)]
pub struct Room {
    /// Identifier the clients joined with; also drives category inference.
    pub id: String,
    /// Participants in join order, unique by id.
    pub participants: Vec<Participant>,
    /// Current lifecycle phase.
    pub phase: RoomPhase,
    /// Payload of the active round.
    pub round: RoundData,
    /// Accumulated scores keyed by participant id, +10 per accepted submission.
    pub scores: IndexMap<String, u32>,
    /// Pairwise matches, populated at finalization only.
    pub matches: Vec<MatchResult>,
    /// Final ranking, populated at finalization only.
    pub leaderboard: Vec<LeaderboardEntry>,
}

impl Room {
    /// Create an empty room in the lobby phase.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            participants: Vec::new(),
            phase: RoomPhase::Lobby,
            round: RoundData::None,
            scores: IndexMap::new(),
            matches: Vec::new(),
            leaderboard: Vec::new(),
        }
    }

    /// Append a participant unless the id is already present.
    ///
    /// First-join semantics own the score baseline: a rejoin keeps the
    /// existing entry and accumulated points untouched.
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        if self.participants.iter().any(|p| p.id == participant.id) {
            return false;
        }
        self.scores.entry(participant.id.clone()).or_insert(0);
        self.participants.push(participant);
        true
    }

    /// Look up a participant by id.
    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Whether the submission map covers every participant.
    pub fn all_submitted(&self) -> bool {
        match self.round.responses() {
            Some(responses) => {
                !self.participants.is_empty() && responses.len() >= self.participants.len()
            }
            None => false,
        }
    }

    /// Reset round progress for a fresh game, keeping participants and scores.
    pub fn reset_for_new_game(&mut self) {
        self.phase = RoomPhase::Lobby;
        self.round = RoundData::None;
        self.matches.clear();
        self.leaderboard.clear();
    }
}
