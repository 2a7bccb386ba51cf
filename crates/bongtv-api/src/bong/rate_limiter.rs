//! bong.tv API call throttle.

use std::time::{Duration, Instant};

/// Default minimum interval between provider calls.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Single-tier rate limiter for the bong.tv API.
///
/// The provider tolerates one effective client per account, so every
/// provider-bound call in the process passes through one shared instance.
/// `wait` sleeps until `min_interval` has elapsed since the last recorded
/// call; `record` stamps the completion time after the call returns,
/// success and failure alike, so failed calls still count against the
/// rate budget.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BongRateLimiter {
    /// Minimum interval between calls.
    min_interval: Duration,
    /// Completion timestamp of the last call.
    last_call: Option<Instant>,
}

impl BongRateLimiter {
    /// Creates a new rate limiter with the given minimum interval.
    pub(crate) const fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    /// Creates a new rate limiter with the default interval (1s).
    pub(crate) const fn default_interval() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }

    /// Waits until the next call is allowed.
    pub async fn wait(&self) {
        if let Some(last) = self.last_call {
            let elapsed = Instant::now().duration_since(last);
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval.saturating_sub(elapsed)).await;
            }
        }
    }

    /// Records the completion of a call.
    pub fn record(&mut self) {
        self.last_call = Some(Instant::now());
    }
}
