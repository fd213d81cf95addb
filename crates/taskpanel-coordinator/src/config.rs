//! Coordinator configuration.

use std::time::Duration;

/// Coordinator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Deadline applied to each round's barrier. Workers still pending when
    /// it expires are cancelled and reported as failed. `None` waits forever.
    pub round_timeout: Option<Duration>,
}

impl CoordinatorConfig {
    /// Builder method to set the per-round timeout.
    pub fn with_round_timeout(mut self, timeout: Duration) -> Self {
        self.round_timeout = Some(timeout);
        self
    }
}
