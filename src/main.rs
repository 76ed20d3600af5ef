// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Coach Weight web server.
//!
//! Serves the sign-in page, runs the Google OAuth flow, and renders
//! a month of weight samples for the signed-in user.

use coach_weight::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        public_url = %config.public_url,
        "Starting Coach Weight"
    );

    let state = Arc::new(AppState::new(config.clone()));
    coach_weight::session::spawn_sweeper(state.clone());
    let app = coach_weight::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coach_weight=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
