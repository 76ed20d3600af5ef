// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The page itself.

use crate::middleware::BrowserSession;
use crate::view;
use crate::AppState;
use axum::{extract::State, response::Html, routing::get, Extension, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// Render the caller's current view state.
async fn index(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<BrowserSession>,
) -> Html<String> {
    let snapshot = state.sessions.snapshot(&session.id);
    Html(view::render(&snapshot))
}
