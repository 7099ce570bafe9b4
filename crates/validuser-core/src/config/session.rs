//! Session liveness configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session liveness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Sessions not seen for this many minutes are pruned.
    #[serde(default = "default_staleness_window")]
    pub staleness_window_minutes: u64,
}

impl SessionConfig {
    /// The staleness window as a [`Duration`].
    pub fn staleness_window(&self) -> Duration {
        Duration::from_secs(self.staleness_window_minutes * 60)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            staleness_window_minutes: default_staleness_window(),
        }
    }
}

fn default_staleness_window() -> u64 {
    60
}
