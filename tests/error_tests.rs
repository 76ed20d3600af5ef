// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use coach_weight::error::{AppError, GoogleError};

async fn json_body(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_internal_error() {
    let err: AppError = anyhow::anyhow!("rng broke").into();
    let (status, body) = json_body(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[test]
fn test_google_error_messages() {
    assert_eq!(
        GoogleError::Auth("denied".to_string()).to_string(),
        "Google authentication failed: denied"
    );
    assert_eq!(
        GoogleError::Malformed("no fpVal".to_string()).to_string(),
        "Malformed Google response: no fpVal"
    );
}

#[test]
fn test_google_error_redact() {
    let err = GoogleError::Network("HTTP 401: bad token tok-123 (tok-123)".to_string());
    assert_eq!(
        err.redact("tok-123"),
        GoogleError::Network("HTTP 401: bad token [REDACTED] ([REDACTED])".to_string())
    );

    let err = GoogleError::Malformed("invalid type: string \"tok-123\"".to_string());
    assert!(!err.redact("tok-123").to_string().contains("tok-123"));

    let err = GoogleError::Auth("denied".to_string());
    assert_eq!(err.clone().redact(""), err);
}
