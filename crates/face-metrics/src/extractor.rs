//! Per-frame metric extraction

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::landmarks::{LandmarkFrame, FACE_MESH};
use crate::ratios::{
    eye_aspect_ratio, head_yaw_offset, mouth_aspect_ratio, DEFAULT_YAW_OFFSET_THRESHOLD,
};

/// Signals derived from one landmark frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameMetrics {
    /// Left eye aspect ratio
    pub left_ear: f64,
    /// Right eye aspect ratio
    pub right_ear: f64,
    /// Mean of both eyes; this is what the classifier thresholds
    pub avg_ear: f64,
    /// Mouth aspect ratio
    pub mar: f64,
    /// Nose offset from the eye line (fraction of face width)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw_offset: Option<f64>,
    /// Head turned beyond the yaw threshold
    pub is_distracted: bool,
}

impl FrameMetrics {
    /// Metrics for a frame whose individual ratios were computed elsewhere
    pub fn from_scores(avg_ear: f64, mar: f64, is_distracted: bool) -> Self {
        Self {
            left_ear: avg_ear,
            right_ear: avg_ear,
            avg_ear,
            mar,
            yaw_offset: None,
            is_distracted,
        }
    }
}

/// Extractor configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Yaw offset above which the frame counts as distracted
    pub yaw_offset_threshold: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            yaw_offset_threshold: DEFAULT_YAW_OFFSET_THRESHOLD,
        }
    }
}

/// Computes [`FrameMetrics`] for landmark frames
#[derive(Debug, Clone, Default)]
pub struct MetricExtractor {
    config: ExtractorConfig,
}

impl MetricExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Compute every signal for one frame
    pub fn extract(&self, frame: &LandmarkFrame) -> FrameMetrics {
        let (width, height) = (frame.width(), frame.height());

        let left_ear = eye_aspect_ratio(&frame.eye_ring(&FACE_MESH.left_eye), width, height);
        let right_ear = eye_aspect_ratio(&frame.eye_ring(&FACE_MESH.right_eye), width, height);
        let avg_ear = (left_ear + right_ear) / 2.0;

        let mar = mouth_aspect_ratio(frame);

        let yaw_offset = head_yaw_offset(frame);
        let is_distracted = yaw_offset.is_some_and(|o| o > self.config.yaw_offset_threshold);

        trace!(
            "Frame metrics: ear={:.3} (l={:.3}, r={:.3}), mar={:.3}, yaw={:?}",
            avg_ear, left_ear, right_ear, mar, yaw_offset
        );

        FrameMetrics {
            left_ear,
            right_ear,
            avg_ear,
            mar,
            yaw_offset,
            is_distracted,
        }
    }
}
