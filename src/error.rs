// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Failures talking to Google.
///
/// None of these reach the user: callers log them and leave state as it was.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GoogleError {
    /// Login rejected or cancelled, or the token exchange was refused.
    #[error("Google authentication failed: {0}")]
    Auth(String),

    /// Transport failure or non-success HTTP status.
    #[error("Google request failed: {0}")]
    Network(String),

    /// Response body did not have the expected shape.
    #[error("Malformed Google response: {0}")]
    Malformed(String),
}

impl GoogleError {
    /// Replace every occurrence of `secret` in the message.
    ///
    /// Error text ends up in logs; a response body or transport error can
    /// echo the access token back.
    pub fn redact(self, secret: &str) -> Self {
        if secret.is_empty() {
            return self;
        }
        let scrub = |msg: String| msg.replace(secret, "[REDACTED]");
        match self {
            GoogleError::Auth(msg) => GoogleError::Auth(scrub(msg)),
            GoogleError::Network(msg) => GoogleError::Network(scrub(msg)),
            GoogleError::Malformed(msg) => GoogleError::Malformed(scrub(msg)),
        }
    }
}

/// Application error type that converts to HTTP responses.
///
/// Google failures never get here; only broken internals do.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
