// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Coach Weight: sign in with Google and see a month of body-weight samples.
//!
//! This crate provides a small server-rendered web app that runs the Google
//! OAuth flow, fetches the user's profile and daily weight summaries from the
//! Google Fitness API, and renders them as a flat HTML list.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;
pub mod view;

use config::Config;
use services::GoogleClient;
use session::SessionStore;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub sessions: SessionStore,
    pub google: GoogleClient,
}

impl AppState {
    /// Build state from config with an empty session store.
    pub fn new(config: Config) -> Self {
        let google = GoogleClient::new(&config);
        Self {
            config,
            sessions: SessionStore::default(),
            google,
        }
    }
}
