// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod page;

use crate::middleware::ensure_session;
use crate::AppState;
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Routes that read or change a browser's view state
    let browser_routes = Router::new()
        .merge(page::routes())
        .merge(auth::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), ensure_session));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .merge(browser_routes)
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ));

    if state.config.is_https() {
        router = router.layer(middleware::from_fn(crate::middleware::security::add_hsts));
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
