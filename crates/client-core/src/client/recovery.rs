//! Reconnect pacing for the room client
//!
//! The source of truth for *whether* to reconnect is the controller's
//! reconnect flag; this module only decides *when* the rotated connect
//! attempt is issued. The default policy reconnects immediately, matching
//! the original behavior; hosts that talk to rate-limited backends can add
//! a fixed delay with optional jitter.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay policy applied between a disconnect and the automatic reconnect
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use mosaic_client_core::client::recovery::ReconnectPolicy;
///
/// let policy = ReconnectPolicy::default();
/// assert!(policy.next_delay().is_zero());
///
/// let policy = ReconnectPolicy::delayed(Duration::from_millis(250))
///     .with_jitter(Duration::from_millis(100));
/// let delay = policy.next_delay();
/// assert!(delay >= Duration::from_millis(250));
/// assert!(delay <= Duration::from_millis(350));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectPolicy {
    /// Fixed delay before the reconnect attempt
    pub delay: Duration,
    /// Upper bound of uniformly distributed extra delay
    pub max_jitter: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }
}

impl ReconnectPolicy {
    /// Reconnect immediately (the default)
    pub fn immediate() -> Self {
        Self::default()
    }

    /// Reconnect after a fixed delay
    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            max_jitter: Duration::ZERO,
        }
    }

    /// Add uniformly distributed jitter on top of the fixed delay
    pub fn with_jitter(mut self, max_jitter: Duration) -> Self {
        self.max_jitter = max_jitter;
        self
    }

    /// Compute the delay for the next reconnect attempt
    pub fn next_delay(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return self.delay;
        }
        let jitter_ms = rand::thread_rng().gen_range(0..=self.max_jitter.as_millis() as u64);
        self.delay + Duration::from_millis(jitter_ms)
    }
}
