//! Temporal classifier
//!
//! Turns per-frame metrics into a debounced status. Blinks and momentary
//! mouth movement never reach the run thresholds; sustained behavior does.
//!
//! Status priority, highest first: Distracted > Yawning > Drowsy > Attentive.

use face_metrics::{FrameMetrics, LandmarkFrame, MetricExtractor};
use tracing::trace;

use crate::analysis::{Status, StatusResult};
use crate::config::ClassifierConfig;
use crate::state::ClassifierState;
use crate::MonitorError;

/// Stateless classifier; the per-session counters live in [`ClassifierState`]
#[derive(Debug, Clone)]
pub struct TemporalClassifier {
    config: ClassifierConfig,
    extractor: MetricExtractor,
}

impl TemporalClassifier {
    /// Create a classifier after validating its configuration
    pub fn new(config: ClassifierConfig) -> Result<Self, MonitorError> {
        config.validate()?;
        Ok(Self {
            extractor: MetricExtractor::new(config.extractor()),
            config,
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify one frame. `None` means the detector found no face.
    pub fn classify(
        &self,
        frame: Option<&LandmarkFrame>,
        state: &mut ClassifierState,
    ) -> StatusResult {
        let metrics = frame.map(|f| self.extractor.extract(f));
        self.classify_metrics(metrics.as_ref(), state)
    }

    /// Advance the session state with precomputed metrics
    pub fn classify_metrics(
        &self,
        metrics: Option<&FrameMetrics>,
        state: &mut ClassifierState,
    ) -> StatusResult {
        // A detection gap neither extends nor breaks the runs
        let Some(metrics) = metrics else {
            return StatusResult::no_face();
        };

        state.observe_eyes_closed(metrics.avg_ear < self.config.ear_threshold);
        state.observe_mouth_open(metrics.mar > self.config.mar_threshold);

        let status = if metrics.is_distracted {
            // Profile views distort both ratios; drop their evidence
            state.reset();
            Status::Distracted
        } else if state.yawn_run_length >= self.config.yawn_run_threshold {
            Status::Yawning
        } else if state.drowsy_run_length >= self.config.drowsy_run_threshold {
            Status::Drowsy
        } else {
            Status::Attentive
        };

        trace!(
            "Classified {} (drowsy_run={}, yawn_run={})",
            status,
            state.drowsy_run_length,
            state.yawn_run_length
        );

        StatusResult::new(status, metrics.avg_ear, metrics.mar)
    }
}

impl Default for TemporalClassifier {
    fn default() -> Self {
        let config = ClassifierConfig::default();
        Self {
            extractor: MetricExtractor::new(config.extractor()),
            config,
        }
    }
}
