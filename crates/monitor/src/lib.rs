//! Attention Monitor
//!
//! Debounced behavioral classification over a stream of face landmark frames:
//! - Drowsiness (sustained low eye aspect ratio)
//! - Yawning (sustained high mouth aspect ratio)
//! - Distraction (head turned away)
//! - Face absence
//!
//! Counters live in a per-session [`ClassifierState`]; the
//! [`SessionRegistry`] keeps one per connected client.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod session;
pub mod state;

pub use analysis::{Status, StatusResult};
pub use classifier::TemporalClassifier;
pub use config::ClassifierConfig;
pub use session::{MonitorSession, SessionHandle, SessionRegistry, SessionSnapshot};
pub use state::ClassifierState;

pub use face_metrics::{FrameMetrics, LandmarkError, LandmarkFrame, NormalizedPoint};

use thiserror::Error;
use uuid::Uuid;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid landmark frame: {0}")]
    Landmarks(#[from] LandmarkError),
}
