//! Static content bank: icebreaker questions, team prompts, meme assets, and bot captions.

use rand::Rng;
use rand::seq::IndexedRandom;

/// Retry budget for each distinct bot caption before duplicates are accepted.
const SAMPLER_RETRY_CAP: usize = 16;

/// Question bank for one thematic room category.
#[derive(Debug)]
struct CategoryBank {
    name: &'static str,
    questions: &'static [&'static str],
}

/// Immutable content catalog resolving a room's theme to its prompts and assets.
///
/// The catalog is pure lookup data: it is built once at startup and shared
/// read-only across all rooms.
#[derive(Debug)]
pub struct Catalog {
    categories: Vec<CategoryBank>,
    default_questions: &'static [&'static str],
    team_prompts: &'static [&'static str],
    meme_templates: &'static [&'static str],
    bot_captions: Vec<&'static str>,
    reactions: &'static [&'static str],
}

impl Catalog {
    /// Build the catalog shipped with the binary.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                CategoryBank {
                    name: "friendship",
                    questions: &[
                        "What's a hobby you've always wanted to pick up but haven't yet?",
                        "What quality do you value most in a best friend?",
                        "If you could have dinner with any fictional character, who would it be?",
                        "What's your favorite way to spend a weekend?",
                        "Describe your perfect day in three words.",
                    ],
                },
                CategoryBank {
                    name: "collaborators",
                    questions: &[
                        "What's your preferred working style: solo deep work or collaborative brainstorming?",
                        "Describe a project you're most proud of.",
                        "How do you handle creative blocks?",
                        "What skill are you currently trying to improve?",
                        "What's the best piece of career advice you've received?",
                    ],
                },
                CategoryBank {
                    name: "mentorship",
                    questions: &[
                        "Who has been the most influential mentor in your life?",
                        "What's a hard lesson you learned recently?",
                        "Where do you see yourself in 5 years?",
                        "What's one area you feel you need the most guidance in?",
                        "What advice would you give to your younger self?",
                    ],
                },
                CategoryBank {
                    name: "travel",
                    questions: &[
                        "What is the number one destination on your bucket list?",
                        "Beach vacation or mountain adventure?",
                        "What's the strangest food you've tried while traveling?",
                        "Do you prefer planning every detail or going with the flow?",
                        "What's your most memorable travel mishap?",
                    ],
                },
                CategoryBank {
                    name: "love-connection",
                    questions: &[
                        "What is your love language?",
                        "What's a non-negotiable for you in a relationship?",
                        "Describe your ideal first date?",
                        "What does 'emotional intimacy' mean to you?",
                        "Do you believe in soulmates?",
                    ],
                },
                CategoryBank {
                    name: "gamers",
                    questions: &[
                        "What was the first video game you ever fell in love with?",
                        "Console, PC, or Mobile? Defend your choice.",
                        "What is the most difficult boss fight you've ever beaten?",
                        "If you could live in any game world, which one would it be?",
                        "Single-player narrative or Multiplayer chaos?",
                    ],
                },
            ],
            default_questions: &[
                "What brings you here today?",
                "What's something you're grateful for?",
                "Coffee or Tea?",
                "Early bird or Night owl?",
                "What's your hidden talent?",
            ],
            team_prompts: &[
                "Design a new app idea that saves the world.",
                "Plan a dream vacation budget for the group.",
                "Come up with a new holiday and how to celebrate it.",
                "Create a survival plan for a zombie apocalypse.",
                "Invent a new sport combining two existing ones.",
            ],
            meme_templates: &[
                "https://i.imgflip.com/30b1gx.jpg",
                "https://i.imgflip.com/1g8my4.jpg",
                "https://i.imgflip.com/26am.jpg",
                "https://i.imgflip.com/1h7in3.jpg",
                "https://i.imgflip.com/1otk96.jpg",
            ],
            bot_captions: vec![
                "When the code works on the first try",
                "Me explaining why I need a 3rd monitor",
                "Deploying to production on a Friday",
                "That one bug that won't go away",
                "My brain at 3 AM",
            ],
            reactions: &["😂", "🔥", "💡", "❤️"],
        }
    }

    /// Infer the thematic category from a room identifier.
    ///
    /// Lookup is a case-insensitive *substring* match against the category
    /// names, falling back to `default`. A room called `travel-123` is a
    /// travel room, but so is `my-travels`; the fuzziness is inherited
    /// behaviour and kept as-is.
    pub fn category_for_room(&self, room_id: &str) -> &'static str {
        let needle = room_id.to_lowercase();
        self.categories
            .iter()
            .find(|bank| needle.contains(bank.name))
            .map(|bank| bank.name)
            .unwrap_or("default")
    }

    /// Question list for a category, or the default list for unknown names.
    pub fn questions(&self, category: &str) -> &'static [&'static str] {
        self.categories
            .iter()
            .find(|bank| bank.name == category)
            .map(|bank| bank.questions)
            .unwrap_or(self.default_questions)
    }

    /// Question presented for the given 1-based instance number, wrapping past the list end.
    pub fn question_for_instance(&self, category: &str, question_no: u8) -> &'static str {
        let list = self.questions(category);
        let index = usize::from(question_no.saturating_sub(1)) % list.len();
        list[index]
    }

    /// Pick a random team-task prompt.
    pub fn random_team_prompt(&self, rng: &mut impl Rng) -> &'static str {
        self.team_prompts.choose(rng).copied().unwrap_or_default()
    }

    /// Pick a random meme template URL.
    pub fn random_meme(&self, rng: &mut impl Rng) -> &'static str {
        self.meme_templates.choose(rng).copied().unwrap_or_default()
    }

    /// Pick a random reaction symbol for a simulated reactor.
    pub fn random_reaction(&self, rng: &mut impl Rng) -> &'static str {
        self.reactions.choose(rng).copied().unwrap_or_default()
    }

    /// Sample `want` bot captions, distinct by value where the pool allows.
    ///
    /// Each pick retries a bounded number of times before accepting a
    /// duplicate, so a pool smaller than `want` terminates instead of
    /// spinning forever.
    pub fn sample_bot_captions(&self, rng: &mut impl Rng, want: usize) -> Vec<&'static str> {
        let mut picked: Vec<&'static str> = Vec::with_capacity(want);
        if self.bot_captions.is_empty() {
            return picked;
        }

        for _ in 0..want {
            let mut candidate = *self
                .bot_captions
                .choose(rng)
                .unwrap_or(&self.bot_captions[0]);
            let mut attempts = 0;
            while picked.contains(&candidate) && attempts < SAMPLER_RETRY_CAP {
                candidate = *self
                    .bot_captions
                    .choose(rng)
                    .unwrap_or(&self.bot_captions[0]);
                attempts += 1;
            }
            picked.push(candidate);
        }

        picked
    }

    #[cfg(test)]
    fn with_bot_captions(bot_captions: Vec<&'static str>) -> Self {
        Self {
            bot_captions,
            ..Self::builtin()
        }
    }
}
