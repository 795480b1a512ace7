//! WebSocket message schema
//!
//! Client → server:
//! ```json
//! {"event": "landmark_frame", "landmarks": [[0.51, 0.42], ...], "width": 640, "height": 480}
//! {"event": "landmark_frame", "landmarks": null}
//! {"event": "reset"}
//! ```
//!
//! Server → client:
//! ```json
//! {"event": "connection_response", "data": {"status": "connected"}}
//! {"event": "status_update", "data": {"status": "Attentive", "ear_score": 0.291, "mar_score": 0.112}}
//! {"event": "error", "data": {"message": "..."}}
//! ```

use monitor::{LandmarkFrame, SessionHandle, StatusResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Messages accepted from the client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientMessage {
    /// One detector output; `landmarks: null` means no face was found.
    /// Image dimensions are required whenever landmarks are present.
    LandmarkFrame {
        landmarks: Option<Vec<[f64; 2]>>,
        width: Option<u32>,
        height: Option<u32>,
    },
    /// Start the session's counters over
    Reset,
}

/// Messages sent to the client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionResponse { status: String },
    StatusUpdate(StatusResult),
    Error { message: String },
}

impl ServerMessage {
    pub fn connected() -> Self {
        ServerMessage::ConnectionResponse {
            status: "connected".to_string(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"event":"error","data":{{"message":"encode failed: {}"}}}}"#, e)
        })
    }
}

/// Decode one client payload and run it through the session.
///
/// Invalid input never reaches the classifier, so the session's counters
/// are untouched by anything that produces an error reply.
pub fn handle_payload(session: &SessionHandle, payload: &[u8]) -> ServerMessage {
    let message: ClientMessage = match serde_json::from_slice(payload) {
        Ok(m) => m,
        Err(e) => {
            warn!("Malformed client message: {}", e);
            return ServerMessage::error(format!("Malformed message: {}", e));
        }
    };

    match message {
        ClientMessage::LandmarkFrame {
            landmarks,
            width,
            height,
        } => {
            let frame = match landmarks {
                Some(pairs) => {
                    let (Some(width), Some(height)) = (width, height) else {
                        warn!("Rejected landmark frame without image dimensions");
                        return ServerMessage::error(
                            "Invalid landmark frame: width and height are required",
                        );
                    };
                    match LandmarkFrame::from_pairs(&pairs, width, height) {
                        Ok(frame) => Some(frame),
                        Err(e) => {
                            warn!("Rejected landmark frame: {}", e);
                            return ServerMessage::error(format!("Invalid landmark frame: {}", e));
                        }
                    }
                }
                None => None,
            };

            match session.process(frame.as_ref()) {
                Ok(result) => {
                    metrics::counter!("monitor_frames_total", "status" => result.status.as_str())
                        .increment(1);
                    ServerMessage::StatusUpdate(result)
                }
                Err(e) => ServerMessage::error(e.to_string()),
            }
        }
        ClientMessage::Reset => match session.reset() {
            Ok(()) => ServerMessage::ConnectionResponse {
                status: "reset".to_string(),
            },
            Err(e) => ServerMessage::error(e.to_string()),
        },
    }
}
