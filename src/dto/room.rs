use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::{
    room::{Caption, LeaderboardEntry, MatchResult, Participant, Room, RoundData},
    state_machine::{MemePhase, RoomPhase, RoundPhase},
};

/// Participant as exposed on the wire, with their accumulated score joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantSummary {
    /// Stable participant identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Accumulated round score.
    pub score: u32,
}

/// One meme caption with its reactions.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaptionSnapshot {
    /// Author identifier (participant or `bot-n`).
    pub user_id: String,
    /// Caption text.
    pub caption: String,
    /// Reactor identifier mapped to the reaction symbol.
    #[schema(value_type = Object)]
    pub reactions: IndexMap<String, String>,
}

impl From<&Caption> for CaptionSnapshot {
    fn from(caption: &Caption) -> Self {
        Self {
            user_id: caption.author_id.clone(),
            caption: caption.text.clone(),
            reactions: caption.reactions.clone(),
        }
    }
}

/// Round payload as serialized into room snapshots.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RoundSnapshot {
    /// No round is active.
    Idle,
    /// Round-1 question instance.
    #[serde(rename_all = "camelCase")]
    Questions {
        /// Question text.
        question: String,
        /// 1-based question instance counter.
        question_count: u8,
        /// Accepted responses keyed by participant id.
        #[schema(value_type = Object)]
        responses: IndexMap<String, String>,
    },
    /// Round-2 team task.
    #[serde(rename_all = "camelCase")]
    TeamTask {
        /// Shared prompt.
        prompt: String,
        /// Accepted responses keyed by participant id.
        #[schema(value_type = Object)]
        responses: IndexMap<String, String>,
    },
    /// Round-3 anonymous chat.
    #[serde(rename_all = "camelCase")]
    BlindChat {
        /// Banner prompt.
        prompt: String,
        /// Symmetric partner map.
        #[schema(value_type = Object)]
        partners: IndexMap<String, String>,
    },
    /// Round-4 meme battle.
    #[serde(rename_all = "camelCase")]
    Meme {
        /// `captioning` or `voting`.
        phase: String,
        /// Meme template URL.
        meme_url: String,
        /// Ordered captions, bots included once voting opens.
        captions: Vec<CaptionSnapshot>,
    },
}

/// One computed match between two participants.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MatchSummary {
    /// First participant of the pair.
    pub user1: ParticipantSummary,
    /// Second participant of the pair.
    pub user2: ParticipantSummary,
    /// Final compatibility score in [70, 100].
    pub score: u32,
    /// Decorative tags such as `Humor Match 😂`.
    pub tags: Vec<String>,
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardRow {
    /// Participant identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Accumulated score.
    pub score: u32,
}

impl From<&LeaderboardEntry> for LeaderboardRow {
    fn from(entry: &LeaderboardEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            score: entry.score,
        }
    }
}

/// Full serialized room state broadcast to every participant.
///
/// This is pure data: timer tasks and connection handles never appear here.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    /// Room identifier.
    pub id: String,
    /// Participants in join order with their scores.
    pub users: Vec<ParticipantSummary>,
    /// Lifecycle label: `lobby`, `round-1`..`round-4`, `results`.
    pub game_state: String,
    /// Current round number, 0 in the lobby.
    pub current_round: u8,
    /// Active round payload.
    pub round_data: RoundSnapshot,
    /// Accumulated scores keyed by participant id.
    #[schema(value_type = Object)]
    pub scores: IndexMap<String, u32>,
    /// Final matches, present once the game finished.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchSummary>,
    /// Final ranking, present once the game finished.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub leaderboard: Vec<LeaderboardRow>,
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        let score_of = |id: &str| room.scores.get(id).copied().unwrap_or(0);
        let summarize = |p: &Participant| ParticipantSummary {
            id: p.id.clone(),
            name: p.name.clone(),
            score: score_of(&p.id),
        };

        let round_data = match (&room.phase, &room.round) {
            (
                RoomPhase::Round(RoundPhase::Questions { question_no }),
                RoundData::Questions { question, responses },
            ) => RoundSnapshot::Questions {
                question: question.clone(),
                question_count: *question_no,
                responses: responses.clone(),
            },
            (_, RoundData::TeamTask { prompt, responses }) => {
                RoundSnapshot::TeamTask {
                    prompt: prompt.clone(),
                    responses: responses.clone(),
                }
            }
            (_, RoundData::BlindPairing { prompt, partners }) => {
                RoundSnapshot::BlindChat {
                    prompt: prompt.clone(),
                    partners: partners.clone(),
                }
            }
            (phase, RoundData::Meme { meme_url, captions, .. }) => {
                let meme_phase = match phase {
                    RoomPhase::Round(RoundPhase::Meme(MemePhase::Captioning)) => "captioning",
                    _ => "voting",
                };
                RoundSnapshot::Meme {
                    phase: meme_phase.to_string(),
                    meme_url: meme_url.clone(),
                    captions: captions.iter().map(CaptionSnapshot::from).collect(),
                }
            }
            // Questions payload outside round 1 should not happen; fall through to idle.
            _ => RoundSnapshot::Idle,
        };

        Self {
            id: room.id.clone(),
            users: room.participants.iter().map(summarize).collect(),
            game_state: room.phase.game_state(),
            current_round: room.phase.current_round(),
            round_data,
            scores: room.scores.clone(),
            matches: room
                .matches
                .iter()
                .map(|m: &MatchResult| MatchSummary {
                    user1: summarize(&m.user1),
                    user2: summarize(&m.user2),
                    score: m.score,
                    tags: m.tags.clone(),
                })
                .collect(),
            leaderboard: room.leaderboard.iter().map(LeaderboardRow::from).collect(),
        }
    }
}
