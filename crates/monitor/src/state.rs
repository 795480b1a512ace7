//! Per-session run-length state

use serde::{Deserialize, Serialize};

/// Consecutive-frame counters for one monitoring session.
///
/// Each counter grows by one on a qualifying frame and drops to zero on a
/// frame that does not qualify.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierState {
    /// Consecutive frames with average EAR below the closed-eye threshold
    pub drowsy_run_length: u32,

    /// Consecutive frames with MAR above the yawn threshold
    pub yawn_run_length: u32,
}

impl ClassifierState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count or break the closed-eye run
    pub fn observe_eyes_closed(&mut self, closed: bool) {
        self.drowsy_run_length = next_run(self.drowsy_run_length, closed);
    }

    /// Count or break the open-mouth run
    pub fn observe_mouth_open(&mut self, open: bool) {
        self.yawn_run_length = next_run(self.yawn_run_length, open);
    }

    /// Drop all in-progress evidence
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn next_run(run: u32, qualifies: bool) -> u32 {
    if qualifies {
        run.saturating_add(1)
    } else {
        0
    }
}
