//! HTTP error mapping for litclock-gr

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by API handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request, rejected before any store access
    #[error("{0}")]
    BadRequest(String),

    /// Legitimate empty outcome (e.g. nothing left to rate)
    #[error("{0}")]
    NotFound(String),

    /// Store unavailable or query failure; the message is what the client sees
    #[error("{message}: {source}")]
    Store {
        message: &'static str,
        #[source]
        source: litclock_common::Error,
    },
}

impl ApiError {
    /// Wrap a store-layer error with a client-facing message
    ///
    /// Input errors keep their 400 status.
    pub fn store(message: &'static str, source: litclock_common::Error) -> Self {
        match source {
            litclock_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            source => ApiError::Store { message, source },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Store { message, source } => {
                error!("{}: {}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
