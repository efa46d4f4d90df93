//! Wait mechanisms for synchronization.
//!
//! Every wait in a scenario is bounded: [`Deadline`] pairs a timeout with a
//! polling interval and the session polls the driver until the condition
//! holds or the deadline expires.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Page load states a navigation can wait for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    /// Wait for the `load` event to fire
    #[default]
    Load,
    /// Wait for `DOMContentLoaded` event
    DomContentLoaded,
}

impl LoadState {
    /// Get the JavaScript event name for this load state
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::DomContentLoaded => "DOMContentLoaded",
        }
    }

    /// Whether `document.readyState` satisfies this load state
    #[must_use]
    pub fn is_reached_by(&self, ready_state: &str) -> bool {
        match self {
            Self::Load => ready_state == "complete",
            Self::DomContentLoaded => matches!(ready_state, "interactive" | "complete"),
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.event_name())
    }
}

/// A bounded wait in progress
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    timeout: Duration,
    poll_interval: Duration,
}

impl Deadline {
    /// Start a wait of `timeout`, polling every `poll_interval`
    #[must_use]
    pub fn after(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            started: Instant::now(),
            timeout,
            poll_interval,
        }
    }

    /// Whether the wait has run out
    #[must_use]
    pub fn expired(&self) -> bool {
        self.started.elapsed() >= self.timeout
    }

    /// Time since the wait started
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Timeout in milliseconds, for error reporting
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Sleep one polling interval, clamped to the remaining time
    pub async fn tick(&self) {
        let remaining = self.timeout.saturating_sub(self.started.elapsed());
        tokio::time::sleep(self.poll_interval.min(remaining)).await;
    }
}
