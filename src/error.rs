//! Domain-specific error types for wardrobe-advisor

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::agents::AgentError;

/// Main error type surfaced at the request boundary
#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Agent output is not valid JSON: {message}")]
    MalformedOutput { message: String, raw: String },

    #[error("Error creating recommendation: {message} (record: {record})")]
    Reconciliation { message: String, record: String },

    #[error("Agent execution failed: {message}")]
    AgentExecution { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WardrobeError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        WardrobeError::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>, raw: impl Into<String>) -> Self {
        WardrobeError::MalformedOutput {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// HTTP status this error maps to at the request boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            WardrobeError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AgentError> for WardrobeError {
    fn from(err: AgentError) -> Self {
        WardrobeError::AgentExecution {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for WardrobeError {
    fn from(err: anyhow::Error) -> Self {
        WardrobeError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for WardrobeError {
    fn from(err: tokio::task::JoinError) -> Self {
        WardrobeError::Internal {
            message: format!("task failed: {}", err),
        }
    }
}

impl IntoResponse for WardrobeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Error processing request: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for wardrobe operations
pub type Result<T> = std::result::Result<T, WardrobeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_request_is_client_error() {
        let err = WardrobeError::invalid_request("Missing prompt in request body");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pipeline_failures_are_server_errors() {
        let errs = [
            WardrobeError::malformed("expected value", "not json"),
            WardrobeError::Reconciliation {
                message: "missing field `price`".into(),
                record: "{}".into(),
            },
            WardrobeError::from(AgentError::Timeout { timeout_ms: 10 }),
        ];
        for err in errs {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn agent_error_keeps_cause() {
        let err = WardrobeError::from(AgentError::Timeout { timeout_ms: 1500 });
        assert!(err.to_string().contains("1500ms"));
    }
}
