//! Final compatibility matching and leaderboard computation.

use indexmap::IndexMap;
use rand::Rng;

use crate::state::room::{Caption, LeaderboardEntry, MatchResult, Participant};

const HUMOR_TAG: &str = "Humor Match 😂";

/// Bonus earned by a pair across the captions of the meme round.
///
/// Each caption both participants reacted to is worth +15, with +10 more when
/// they picked the identical symbol.
pub fn humor_bonus(a: &str, b: &str, captions: &[Caption]) -> u32 {
    let mut bonus = 0;
    for caption in captions {
        let (Some(reaction_a), Some(reaction_b)) =
            (caption.reactions.get(a), caption.reactions.get(b))
        else {
            continue;
        };
        bonus += 15;
        if reaction_a == reaction_b {
            bonus += 10;
        }
    }
    bonus
}

/// Score every unordered pair of participants and rank the room.
///
/// `base` supplies the random base score per pair, which keeps the pairing and
/// bonus arithmetic deterministic under test. Both result lists are stable
/// descending sorts, so ties keep enumeration order.
pub fn finalize(
    participants: &[Participant],
    scores: &IndexMap<String, u32>,
    captions: &[Caption],
    mut base: impl FnMut() -> u32,
) -> (Vec<MatchResult>, Vec<LeaderboardEntry>) {
    let mut matches = Vec::new();
    for (i, user1) in participants.iter().enumerate() {
        for user2 in &participants[i + 1..] {
            let bonus = humor_bonus(&user1.id, &user2.id, captions);
            let score = (base() + bonus).min(100);
            let tags = if bonus > 20 {
                vec![HUMOR_TAG.to_string()]
            } else {
                Vec::new()
            };
            matches.push(MatchResult {
                user1: user1.clone(),
                user2: user2.clone(),
                score,
                tags,
            });
        }
    }
    matches.sort_by(|a, b| b.score.cmp(&a.score));

    let mut leaderboard: Vec<LeaderboardEntry> = participants
        .iter()
        .map(|p| LeaderboardEntry {
            id: p.id.clone(),
            name: p.name.clone(),
            score: scores.get(&p.id).copied().unwrap_or(0),
        })
        .collect();
    leaderboard.sort_by(|a, b| b.score.cmp(&a.score));

    (matches, leaderboard)
}

/// Production entry point drawing base scores uniformly from [70, 90).
pub fn compute(
    participants: &[Participant],
    scores: &IndexMap<String, u32>,
    captions: &[Caption],
) -> (Vec<MatchResult>, Vec<LeaderboardEntry>) {
    let mut rng = rand::rng();
    finalize(participants, scores, captions, || rng.random_range(70..90))
}
