//! Application-level configuration loading, covering round timings and bot behaviour.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "MINGLE_BACK_CONFIG_PATH";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Countdown for each of the round-1 question instances, in seconds.
    pub question_seconds: u64,
    /// Number of question instances played inside round 1.
    pub question_count: u8,
    /// Countdown for the round-2 team task, in seconds.
    pub team_task_seconds: u64,
    /// Countdown for the round-3 blind chat, in seconds.
    pub blind_chat_seconds: u64,
    /// Countdown for the round-4 captioning phase, in seconds.
    pub caption_seconds: u64,
    /// Countdown for the round-4 voting phase, in seconds.
    pub voting_seconds: u64,
    /// Fallback countdown armed by a lone first submission, in seconds.
    pub fallback_seconds: u64,
    /// Pause between an all-submitted detection and the completion logic.
    pub completion_delay: Duration,
    /// Debounce between a completed round-instance and the next one.
    pub advance_delay: Duration,
    /// Number of bot captions injected when voting opens.
    pub bot_caption_count: usize,
    /// Size of the synthetic reactor identity pool used during voting.
    pub bot_reactor_pool: u32,
    /// Probability that a voting tick produces a simulated reaction.
    pub reaction_probability: f64,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(path = %path.display(), "loaded engine configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            question_seconds: 30,
            question_count: 5,
            team_task_seconds: 60,
            blind_chat_seconds: 120,
            caption_seconds: 45,
            voting_seconds: 30,
            fallback_seconds: 5,
            completion_delay: Duration::from_millis(1000),
            advance_delay: Duration::from_millis(1500),
            bot_caption_count: 3,
            bot_reactor_pool: 10,
            reaction_probability: 0.7,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
///
/// Every field is optional so operators can override a single knob.
struct RawConfig {
    question_seconds: Option<u64>,
    question_count: Option<u8>,
    team_task_seconds: Option<u64>,
    blind_chat_seconds: Option<u64>,
    caption_seconds: Option<u64>,
    voting_seconds: Option<u64>,
    fallback_seconds: Option<u64>,
    completion_delay_ms: Option<u64>,
    advance_delay_ms: Option<u64>,
    bot_caption_count: Option<usize>,
    bot_reactor_pool: Option<u32>,
    reaction_probability: Option<f64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            question_seconds: value.question_seconds.unwrap_or(defaults.question_seconds),
            question_count: value.question_count.unwrap_or(defaults.question_count),
            team_task_seconds: value
                .team_task_seconds
                .unwrap_or(defaults.team_task_seconds),
            blind_chat_seconds: value
                .blind_chat_seconds
                .unwrap_or(defaults.blind_chat_seconds),
            caption_seconds: value.caption_seconds.unwrap_or(defaults.caption_seconds),
            voting_seconds: value.voting_seconds.unwrap_or(defaults.voting_seconds),
            fallback_seconds: value.fallback_seconds.unwrap_or(defaults.fallback_seconds),
            completion_delay: value
                .completion_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.completion_delay),
            advance_delay: value
                .advance_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.advance_delay),
            bot_caption_count: value
                .bot_caption_count
                .unwrap_or(defaults.bot_caption_count),
            bot_reactor_pool: value.bot_reactor_pool.unwrap_or(defaults.bot_reactor_pool),
            reaction_probability: value
                .reaction_probability
                .unwrap_or(defaults.reaction_probability),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
