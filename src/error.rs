//! Error types for the team selection service
//!
//! Start-up and configuration code uses anyhow, while request handling uses
//! the typed [`ClubError`] so every failure maps onto a single HTTP status.

use crate::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced by the club service to API callers
#[derive(Debug, thiserror::Error)]
pub enum ClubError {
    #[error("Player '{name}' not found.")]
    PlayerNotFound { name: String },

    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },

    /// Team selection hides store detail from callers.
    #[error("Error in team selection")]
    SelectionFailed {
        #[source]
        source: StoreError,
    },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl ClubError {
    /// Wrap a store failure with the endpoint-specific context message
    pub fn store(context: impl Into<String>, source: StoreError) -> Self {
        ClubError::Store {
            context: context.into(),
            source,
        }
    }

    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ClubError::PlayerNotFound { .. } => StatusCode::NOT_FOUND,
            ClubError::Store { .. } | ClubError::SelectionFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ClubError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ClubError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if let ClubError::SelectionFailed { source } = &self {
            error!("Team selection failed: {}", source);
        }

        let body = Json(ErrorResponse {
            error: status.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
