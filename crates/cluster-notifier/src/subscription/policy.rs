//! # Reconnect Policy

use std::time::Duration;

/// Fixed-delay, unlimited restart policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    backoff: Duration,
}

impl ReconnectPolicy {
    /// Delay used when nothing else is configured.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(10);

    /// Wait `backoff` between every attempt.
    pub const fn fixed(backoff: Duration) -> Self {
        Self { backoff }
    }

    /// Delay before the next attempt, whatever the attempt number.
    pub const fn backoff(&self) -> Duration {
        self.backoff
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(Self::DEFAULT_BACKOFF)
    }
}
