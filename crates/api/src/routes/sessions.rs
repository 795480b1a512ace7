//! Session Routes

use axum::{
    extract::{Path, Query, State},
    Json,
};
use monitor::SessionSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiError, AppState};

/// Query parameters for sessions endpoint
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    /// Only sessions currently in an alert status
    #[serde(default)]
    pub alerting: bool,
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for sessions endpoint
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub data: Vec<SessionSnapshot>,
    pub count: usize,
    pub alerting_count: usize,
}

/// List live sessions
pub async fn get_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionQuery>,
) -> Result<Json<SessionResponse>, ApiError> {
    let mut sessions = state.registry.snapshots()?;
    sessions.sort_by(|a, b| b.age_secs.cmp(&a.age_secs));

    let is_alerting =
        |s: &SessionSnapshot| s.last_status.map(|status| status.is_alert()).unwrap_or(false);
    let alerting_count = sessions.iter().filter(|s| is_alerting(s)).count();

    let data: Vec<SessionSnapshot> = sessions
        .into_iter()
        .filter(|s| !params.alerting || is_alerting(s))
        .take(params.limit.min(1000))
        .collect();

    Ok(Json(SessionResponse {
        count: data.len(),
        alerting_count,
        data,
    }))
}

/// Get one session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let snapshot = state.registry.get(id)?.snapshot()?;
    Ok(Json(snapshot))
}
