//! Face Metrics
//!
//! Per-frame geometric signals computed from face mesh landmarks:
//! - Eye Aspect Ratio (EAR) for eye closure
//! - Mouth Aspect Ratio (MAR) for yawning
//! - Nose offset from the eye line as a head-yaw (distraction) proxy
//!
//! Everything here is pure: a frame goes in, numbers come out.

mod extractor;
mod geometry;
mod landmarks;
mod ratios;

pub use extractor::{ExtractorConfig, FrameMetrics, MetricExtractor};
pub use geometry::{distance, NormalizedPoint, PixelPoint};
pub use landmarks::{LandmarkFrame, LandmarkIndexSet, MouthIndices, FACE_MESH, FACE_MESH_LANDMARKS};
pub use ratios::{
    estimate_distraction, eye_aspect_ratio, head_yaw_offset, mouth_aspect_ratio,
    DEFAULT_YAW_OFFSET_THRESHOLD,
};

use thiserror::Error;

/// Landmark frame construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("Expected at least {expected} landmarks, got {actual}")]
    TooFewLandmarks { expected: usize, actual: usize },

    #[error("Landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    #[error("Frame dimensions must be non-zero, got {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
}
