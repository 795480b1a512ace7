//! Classification results

use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavioral status for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// No face landmarks for this frame
    #[serde(rename = "No Face Detected")]
    NoFace,

    /// Face visible, no sustained warning signs
    Attentive,

    /// Eyes closed for a sustained run
    Drowsy,

    /// Mouth wide open for a sustained run
    Yawning,

    /// Head turned away from the screen
    Distracted,
}

impl Status {
    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NoFace => "No Face Detected",
            Status::Attentive => "Attentive",
            Status::Drowsy => "Drowsy",
            Status::Yawning => "Yawning",
            Status::Distracted => "Distracted",
        }
    }

    /// Whether this status should raise an alert on the client
    pub fn is_alert(&self) -> bool {
        matches!(self, Status::Drowsy | Status::Yawning | Status::Distracted)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted per frame: the status plus the raw scores behind it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusResult {
    pub status: Status,
    /// Average EAR, 3 decimals
    pub ear_score: f64,
    /// MAR, 3 decimals
    pub mar_score: f64,
}

impl StatusResult {
    /// Build a result, rounding scores for display
    pub fn new(status: Status, ear: f64, mar: f64) -> Self {
        Self {
            status,
            ear_score: round3(ear),
            mar_score: round3(mar),
        }
    }

    pub fn no_face() -> Self {
        Self {
            status: Status::NoFace,
            ear_score: 0.0,
            mar_score: 0.0,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
