//! Update rate control for session snapshot streams

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a subscriber wants session snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "tauri", derive(specta::Type))]
pub enum UpdateRate {
    /// Every snapshot the engine publishes
    #[default]
    Native,

    /// Coalesced to at most this many snapshots per second
    /// A rate of zero is treated as Native
    Max(u32),
}

impl UpdateRate {
    /// Collapse degenerate rates to `Native`.
    pub fn normalize(self) -> Self {
        match self {
            UpdateRate::Max(0) => UpdateRate::Native,
            other => other,
        }
    }

    /// Minimum spacing between snapshots, if any.
    pub fn coalesce_interval(self) -> Option<Duration> {
        match self.normalize() {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}
