use std::{
    env::{self, VarError},
    time::Duration,
};

use crate::{bot_handler::GameExitPolicy, poller::RetryPolicy};

const DEFAULT_POLL_INTERVAL: u64 = 1;
// Kept below the HTTP client's request timeout.
const DEFAULT_POLL_TIMEOUT: u32 = 10;
const DEFAULT_MAX_BACKOFF: u64 = 60;

/// Represents the application configuration.
#[derive(Debug)]
pub struct Config {
    /// The Telegram bot token.
    pub telegram_bot_token: String,
    /// The interval in seconds between two polls for updates.
    pub poll_interval: u64,
    /// How long in seconds the server may hold a poll open.
    pub poll_timeout: u32,
    /// The longest wait in seconds between polls while polling keeps failing.
    pub max_backoff: u64,
    /// Consecutive failed polls after which the bot stops. Unbounded if unset.
    pub max_retry_attempts: Option<u32>,
    /// Conversations kept in memory before the oldest is forgotten. Unbounded
    /// if unset.
    pub max_conversations: Option<usize>,
    /// Whether `/leavegame` takes a conversation out of a game.
    pub allow_leave_game: bool,
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    pub fn from_env() -> Result<Self, VarError> {
        Ok(Self {
            telegram_bot_token: env::var("TELOXIDE_TOKEN")?,
            poll_interval: env::var("POLL_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            poll_timeout: env::var("POLL_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_POLL_TIMEOUT),
            max_backoff: env::var("MAX_BACKOFF")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BACKOFF),
            max_retry_attempts: env::var("MAX_RETRY_ATTEMPTS").ok().and_then(|v| v.parse().ok()),
            max_conversations: env::var("MAX_CONVERSATIONS").ok().and_then(|v| v.parse().ok()),
            allow_leave_game: env::var("ALLOW_LEAVE_GAME")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }

    /// Poll pacing derived from the interval, backoff and attempt settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            poll_interval: Duration::from_secs(self.poll_interval),
            max_backoff: Duration::from_secs(self.max_backoff),
            max_attempts: self.max_retry_attempts,
        }
    }

    /// `LeaveCommand` when `ALLOW_LEAVE_GAME` is set, `Terminal` otherwise.
    pub fn game_exit_policy(&self) -> GameExitPolicy {
        if self.allow_leave_game { GameExitPolicy::LeaveCommand } else { GameExitPolicy::Terminal }
    }
}
