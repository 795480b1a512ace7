//! Monitoring sessions and the live-session registry
//!
//! Every connected client gets its own [`MonitorSession`]. Frames for one
//! session go through that session's lock one at a time, so run lengths see
//! frames in arrival order; different sessions never share mutable data.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use face_metrics::LandmarkFrame;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::analysis::{Status, StatusResult};
use crate::classifier::TemporalClassifier;
use crate::state::ClassifierState;
use crate::MonitorError;

/// Serializable view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub frames_processed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<Status>,
    pub state: ClassifierState,
    pub age_secs: u64,
}

/// One client's classification session
pub struct MonitorSession {
    id: Uuid,
    classifier: Arc<TemporalClassifier>,
    state: ClassifierState,
    frames_processed: u64,
    last_status: Option<Status>,
    started_at: Instant,
}

impl MonitorSession {
    /// Start a session with fresh counters
    pub fn new(classifier: Arc<TemporalClassifier>) -> Self {
        Self::with_id(Uuid::new_v4(), classifier)
    }

    pub fn with_id(id: Uuid, classifier: Arc<TemporalClassifier>) -> Self {
        Self {
            id,
            classifier,
            state: ClassifierState::new(),
            frames_processed: 0,
            last_status: None,
            started_at: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn last_status(&self) -> Option<Status> {
        self.last_status
    }

    /// Classify the next frame of this session
    pub fn process(&mut self, frame: Option<&LandmarkFrame>) -> StatusResult {
        let result = self.classifier.classify(frame, &mut self.state);
        self.frames_processed += 1;

        if self.last_status != Some(result.status) {
            if result.status.is_alert() {
                info!(
                    "Session {} entered {} (ear={:.3}, mar={:.3})",
                    self.id, result.status, result.ear_score, result.mar_score
                );
            } else {
                debug!(
                    "Session {} status {:?} -> {}",
                    self.id, self.last_status, result.status
                );
            }
            self.last_status = Some(result.status);
        }

        result
    }

    /// Start over as if the session had just begun
    pub fn reset(&mut self) {
        debug!("Session {} reset after {} frames", self.id, self.frames_processed);
        self.state.reset();
        self.last_status = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            frames_processed: self.frames_processed,
            last_status: self.last_status,
            state: self.state,
            age_secs: self.started_at.elapsed().as_secs(),
        }
    }
}

/// Shared, lockable reference to one session
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<MonitorSession>>,
}

impl SessionHandle {
    fn new(session: MonitorSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Classify one frame while holding the session lock
    pub fn process(&self, frame: Option<&LandmarkFrame>) -> Result<StatusResult, MonitorError> {
        let mut session = self.lock()?;
        Ok(session.process(frame))
    }

    pub fn reset(&self) -> Result<(), MonitorError> {
        self.lock()?.reset();
        Ok(())
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot, MonitorError> {
        Ok(self.lock()?.snapshot())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MonitorSession>, MonitorError> {
        self.inner
            .lock()
            .map_err(|e| MonitorError::LockPoisoned(format!("session: {}", e)))
    }
}

/// All live sessions, keyed by id
pub struct SessionRegistry {
    classifier: Arc<TemporalClassifier>,
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(classifier: TemporalClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn classifier(&self) -> &TemporalClassifier {
        &self.classifier
    }

    /// Register a new session with fresh counters
    pub fn open(&self) -> Result<(Uuid, SessionHandle), MonitorError> {
        let session = MonitorSession::new(Arc::clone(&self.classifier));
        let id = session.id();
        let handle = SessionHandle::new(session);

        let mut sessions = self.write()?;
        sessions.insert(id, handle.clone());
        info!("Session {} opened ({} active)", id, sessions.len());

        Ok((id, handle))
    }

    pub fn get(&self, id: Uuid) -> Result<SessionHandle, MonitorError> {
        self.read()?
            .get(&id)
            .cloned()
            .ok_or(MonitorError::SessionNotFound(id))
    }

    /// Drop a session; its counters go with it
    pub fn close(&self, id: Uuid) -> Result<(), MonitorError> {
        let mut sessions = self.write()?;
        match sessions.remove(&id) {
            Some(_) => {
                info!("Session {} closed ({} active)", id, sessions.len());
                Ok(())
            }
            None => Err(MonitorError::SessionNotFound(id)),
        }
    }

    /// Number of live sessions
    pub fn len(&self) -> Result<usize, MonitorError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, MonitorError> {
        Ok(self.read()?.is_empty())
    }

    pub fn snapshots(&self) -> Result<Vec<SessionSnapshot>, MonitorError> {
        let handles: Vec<SessionHandle> = self.read()?.values().cloned().collect();
        handles.iter().map(SessionHandle::snapshot).collect()
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<Uuid, SessionHandle>>, MonitorError> {
        self.sessions
            .read()
            .map_err(|e| MonitorError::LockPoisoned(format!("registry: {}", e)))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, SessionHandle>>, MonitorError> {
        self.sessions
            .write()
            .map_err(|e| MonitorError::LockPoisoned(format!("registry: {}", e)))
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(TemporalClassifier::default())
    }
}
