
use std::{sync::Arc, time::Duration};

use backoff::{ExponentialBackoff, backoff::Backoff};
use thiserror::Error;

use crate::messaging::{MessagingGateway, RawUpdate};

/// Errors that stop the update loop.
#[derive(Debug, Error)]
pub enum PollerError {
    /// Too many fetches failed in a row.
    #[error("Gave up after {0} consecutive failed fetches")]
    RetriesExhausted(u32),
}

type Result<T> = std::result::Result<T, PollerError>;

/// How long to wait between fetches and when to stop retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after a successful fetch, and the first delay after a failure.
    pub poll_interval: Duration,
    /// Upper bound for the delay while fetches keep failing.
    pub max_backoff: Duration,
    /// Consecutive failed fetches after which polling stops. `None` retries
    /// forever.
    pub max_attempts: Option<u32>,
}

/// The highest update sequence number seen so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateCursor {
    last_seen: Option<u64>,
}

impl UpdateCursor {
    /// The highest update id seen, if any.
    pub fn last_seen(&self) -> Option<u64> {
        self.last_seen
    }

    /// The offset to request so that only unseen updates are returned.
    pub fn next_offset(&self) -> u64 {
        self.last_seen.map_or(0, |id| id.saturating_add(1))
    }

    /// Whether `update_id` lies past the cursor.
    pub fn is_new(&self, update_id: u64) -> bool {
        self.last_seen.is_none_or(|id| update_id > id)
    }

    /// Moves the cursor forward to `update_id`. Never moves it back.
    pub fn advance(&mut self, update_id: u64) {
        self.last_seen = Some(self.last_seen.map_or(update_id, |id| id.max(update_id)));
    }
}

/// Pulls batches of updates from the gateway.
pub struct UpdatePoller {
    gateway: Arc<dyn MessagingGateway>,
    cursor: UpdateCursor,
    // Long-poll timeout in seconds passed to the gateway.
    poll_timeout: u32,
    retry: RetryPolicy,
    backoff: ExponentialBackoff,
    consecutive_failures: u32,
}

impl UpdatePoller {
    /// Create a new UpdatePoller.
    pub fn new(gateway: Arc<dyn MessagingGateway>, poll_timeout: u32, retry: RetryPolicy) -> Self {
        Self {
            gateway,
            cursor: UpdateCursor::default(),
            poll_timeout,
            retry,
            backoff: Self::backoff_config(&retry),
            consecutive_failures: 0,
        }
    }

    fn backoff_config(retry: &RetryPolicy) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            current_interval: retry.poll_interval,
            initial_interval: retry.poll_interval,
            max_interval: retry.max_backoff.max(retry.poll_interval),
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };
        backoff.reset();
        backoff
    }

    /// A copy of the current cursor.
    pub fn cursor(&self) -> UpdateCursor {
        self.cursor
    }

    /// Failed fetches since the last success.
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Fetches the next batch of unseen updates.
    ///
    /// The cursor advances over every returned update, including ones the
    /// classifier will later drop. A failed fetch yields an empty batch and
    /// leaves the cursor where it was, so the same window is requested again
    /// next cycle.
    pub async fn fetch_batch(&mut self) -> Vec<RawUpdate> {
        let previous = self.cursor;

        let updates = match self
            .gateway
            .fetch_updates(previous.next_offset(), self.poll_timeout)
            .await
        {
            Ok(updates) => updates,
            Err(e) => {
                self.consecutive_failures += 1;
                if e.is_malformed() {
                    tracing::error!(
                        "Could not parse updates at offset {}: {e}. Treating batch as empty.",
                        previous.next_offset()
                    );
                } else {
                    tracing::warn!(
                        "Failed to fetch updates at offset {} (attempt {}): {e}. Will be retried \
                         next cycle",
                        previous.next_offset(),
                        self.consecutive_failures
                    );
                }
                return Vec::new();
            }
        };

        self.consecutive_failures = 0;
        for update in &updates {
            self.cursor.advance(update.update_id);
        }

        let total = updates.len();
        let fresh = updates
            .into_iter()
            .filter(|update| previous.is_new(update.update_id))
            .collect::<Vec<_>>();

        if fresh.len() != total {
            tracing::warn!("Dropped {} already seen updates", total - fresh.len());
        }
        tracing::debug!("Fetched {} updates, cursor at {:?}", fresh.len(), self.cursor.last_seen());

        fresh
    }

    /// How long to wait before the next fetch.
    ///
    /// Grows exponentially while fetches keep failing and fails once
    /// `max_attempts` consecutive fetches have failed.
    pub fn next_delay(&mut self) -> Result<Duration> {
        if self.consecutive_failures == 0 {
            self.backoff.reset();
            return Ok(self.retry.poll_interval);
        }

        if self.retry.max_attempts.is_some_and(|max| self.consecutive_failures >= max) {
            tracing::error!(
                "Giving up after {} consecutive failed fetches",
                self.consecutive_failures
            );
            return Err(PollerError::RetriesExhausted(self.consecutive_failures));
        }

        Ok(self.backoff.next_backoff().unwrap_or(self.retry.max_backoff))
    }
}
