//! Bounded status polling.
//!
//! Replaces open-ended "check again in a bit" loops with an explicit attempt
//! budget and a capped exponential backoff. Nothing is persisted; dropping the
//! returned future abandons the poll.

use crate::services::{PaymentStatusSource, StatusSnapshot};
use payflow_config::PollingConfig;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempt budget and backoff for [`poll_until_terminal`].
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_factor: f64,
    max_delay: Duration,
}

impl PollPolicy {
    /// `max_attempts` is raised to 1, a factor below 1.0 (or NaN) becomes 1.0,
    /// and `max_delay` is raised to `initial_delay`.
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        backoff_factor: f64,
        max_delay: Duration,
    ) -> Self {
        let backoff_factor = if backoff_factor >= 1.0 && backoff_factor.is_finite() {
            backoff_factor
        } else {
            1.0
        };
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            backoff_factor,
            max_delay: max_delay.max(initial_delay),
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the `attempt`-th fetch (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_delay.as_secs_f64() {
            return self.max_delay;
        }
        Duration::from_secs_f64(scaled)
    }
}

impl From<&PollingConfig> for PollPolicy {
    fn from(config: &PollingConfig) -> Self {
        PollPolicy::new(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
            config.backoff_factor,
            Duration::from_millis(config.max_delay_ms),
        )
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy::from(&PollingConfig::default())
    }
}

/// Result of a finished poll.
#[derive(Debug, Clone, Serialize)]
pub struct PollOutcome {
    /// Last snapshot observed.
    pub snapshot: StatusSnapshot,
    /// Number of fetches performed.
    pub attempts: u32,
    /// `false` when the budget ran out before a terminal state.
    pub completed: bool,
}

/// Polls `source` until it reports a terminal state or the budget is spent.
///
/// Running out of attempts is not an error: the last snapshot is returned
/// with `completed = false`. A failed fetch aborts the poll and is returned
/// as-is.
pub async fn poll_until_terminal<S>(
    source: &S,
    reference: &str,
    policy: &PollPolicy,
) -> Result<PollOutcome, S::Error>
where
    S: PaymentStatusSource + ?Sized,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let snapshot = source.fetch_status(reference).await?;
        debug!(
            reference,
            attempt,
            status = ?snapshot.status,
            terminal = snapshot.terminal,
            "polled payment status"
        );

        if snapshot.terminal {
            return Ok(PollOutcome {
                snapshot,
                attempts: attempt,
                completed: true,
            });
        }

        if attempt >= policy.max_attempts {
            warn!(
                reference,
                attempts = attempt,
                "payment still pending after polling budget was exhausted"
            );
            return Ok(PollOutcome {
                snapshot,
                attempts: attempt,
                completed: false,
            });
        }

        tokio::time::sleep(policy.delay_after(attempt)).await;
    }
}
