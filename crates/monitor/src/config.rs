//! Classifier configuration

use std::time::Duration;

use face_metrics::{ExtractorConfig, DEFAULT_YAW_OFFSET_THRESHOLD};
use serde::{Deserialize, Serialize};

use crate::MonitorError;

/// Sustained eye closure needed before reporting drowsiness
const DROWSY_WINDOW_SECS: f64 = 2.0;

/// Sustained wide mouth needed before reporting a yawn
const YAWN_WINDOW_SECS: f64 = 1.6;

/// Temporal classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Average EAR below this counts as eyes closed
    pub ear_threshold: f64,

    /// MAR above this counts as mouth open
    pub mar_threshold: f64,

    /// Consecutive closed-eye frames before Drowsy
    pub drowsy_run_threshold: u32,

    /// Consecutive open-mouth frames before Yawning
    pub yawn_run_threshold: u32,

    /// Nose offset (fraction of face width) above which the head is turned away
    pub yaw_offset_threshold: f64,

    /// Expected input rate the run thresholds are calibrated for
    pub frame_rate_hz: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.22,
            mar_threshold: 0.6,
            drowsy_run_threshold: 10, // ~2s at 5 fps
            yawn_run_threshold: 8,    // ~1.6s at 5 fps
            yaw_offset_threshold: DEFAULT_YAW_OFFSET_THRESHOLD,
            frame_rate_hz: 5.0,
        }
    }
}

impl ClassifierConfig {
    /// Create strict config (reacts sooner, flags smaller deviations)
    pub fn strict() -> Self {
        Self {
            ear_threshold: 0.24,
            mar_threshold: 0.5,
            drowsy_run_threshold: 6,
            yawn_run_threshold: 5,
            yaw_offset_threshold: 0.2,
            ..Default::default()
        }
    }

    /// Create lenient config (needs longer, clearer evidence)
    pub fn lenient() -> Self {
        Self {
            ear_threshold: 0.18,
            mar_threshold: 0.7,
            drowsy_run_threshold: 15,
            yawn_run_threshold: 12,
            yaw_offset_threshold: 0.4,
            ..Default::default()
        }
    }

    /// Default thresholds with run lengths rescaled so the wall-clock
    /// debounce windows stay the same at a different input rate
    pub fn for_frame_rate(frame_rate_hz: f64) -> Self {
        Self {
            drowsy_run_threshold: frames_for(DROWSY_WINDOW_SECS, frame_rate_hz),
            yawn_run_threshold: frames_for(YAWN_WINDOW_SECS, frame_rate_hz),
            frame_rate_hz,
            ..Default::default()
        }
    }

    /// Wall-clock time of a full drowsy run at the configured rate
    pub fn drowsy_window(&self) -> Duration {
        window(self.drowsy_run_threshold, self.frame_rate_hz)
    }

    /// Wall-clock time of a full yawn run at the configured rate
    pub fn yawn_window(&self) -> Duration {
        window(self.yawn_run_threshold, self.frame_rate_hz)
    }

    /// Extractor settings derived from this config
    pub fn extractor(&self) -> ExtractorConfig {
        ExtractorConfig {
            yaw_offset_threshold: self.yaw_offset_threshold,
        }
    }

    /// Reject values the classifier cannot work with
    pub fn validate(&self) -> Result<(), MonitorError> {
        if !(self.frame_rate_hz.is_finite() && self.frame_rate_hz > 0.0) {
            return Err(MonitorError::Config(format!(
                "frame_rate_hz must be positive, got {}",
                self.frame_rate_hz
            )));
        }
        if self.drowsy_run_threshold == 0 || self.yawn_run_threshold == 0 {
            return Err(MonitorError::Config(
                "run thresholds must be at least one frame".to_string(),
            ));
        }
        for (name, value) in [
            ("ear_threshold", self.ear_threshold),
            ("mar_threshold", self.mar_threshold),
            ("yaw_offset_threshold", self.yaw_offset_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MonitorError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

fn frames_for(window_secs: f64, frame_rate_hz: f64) -> u32 {
    if !(frame_rate_hz.is_finite() && frame_rate_hz > 0.0) {
        return 1;
    }
    // Float noise just above a whole frame count must not add a frame
    let frames = (window_secs * frame_rate_hz - 1e-9).ceil();
    frames.clamp(1.0, u32::MAX as f64) as u32
}

fn window(run_threshold: u32, frame_rate_hz: f64) -> Duration {
    if !(frame_rate_hz.is_finite() && frame_rate_hz > 0.0) {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(run_threshold as f64 / frame_rate_hz)
}
