//! Directory service errors

use org_hierarchy_types::{ApiErrorBody, NodeId};
use thiserror::Error;

/// Shown when the server gave us nothing readable
pub const GENERIC_FAILURE_MESSAGE: &str = "The directory service could not complete the request";

#[derive(Error, Debug, Clone)]
pub enum DirectoryError {
    #[error("Directory request failed: {0}")]
    Transport(String),

    #[error("Directory returned HTTP {status}: {raw}")]
    Status {
        status: u16,
        body: Option<ApiErrorBody>,
        raw: String,
    },

    #[error("Failed to decode directory response: {0}")]
    Decode(String),

    #[error("Employee '{id}' not found")]
    NotFound {
        id: NodeId,
        /// Parsed 404 body, when the server sent one
        body: Option<ApiErrorBody>,
    },

    #[error("Invalid directory configuration: {0}")]
    Config(String),
}

impl DirectoryError {
    /// Best message to show a user: `detail`, then `message`, then the raw
    /// body, then a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            DirectoryError::Status { body, raw, .. } => body
                .as_ref()
                .and_then(ApiErrorBody::best_message)
                .or_else(|| {
                    let raw = raw.trim();
                    (!raw.is_empty()).then(|| raw.to_string())
                })
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string()),
            DirectoryError::NotFound { body, .. } => body
                .as_ref()
                .and_then(ApiErrorBody::best_message)
                .unwrap_or_else(|| self.to_string()),
            DirectoryError::Transport(msg) | DirectoryError::Decode(msg) if !msg.trim().is_empty() => {
                msg.clone()
            }
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Build a status error from a response body, parsing it when it is JSON
    pub fn from_status(status: u16, raw: String) -> Self {
        let body = serde_json::from_str::<ApiErrorBody>(&raw).ok();
        DirectoryError::Status { status, body, raw }
    }

    /// 404 for `id`, keeping whatever the server said about it
    pub fn not_found(id: &NodeId, raw: &str) -> Self {
        DirectoryError::NotFound {
            id: id.clone(),
            body: serde_json::from_str::<ApiErrorBody>(raw).ok(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            DirectoryError::Status { status, .. } => Some(*status),
            DirectoryError::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DirectoryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DirectoryError::Decode(err.to_string())
        } else {
            DirectoryError::Transport(err.to_string())
        }
    }
}
