// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-browser view state, kept in memory only.
//!
//! Each browser gets an opaque random id (carried in a cookie) that keys one
//! [`ViewState`]. All mutation goes through the update methods below; the
//! renderer only ever sees a snapshot.
//!
//! Nothing is stored for a browser until sign-in. Anonymous visitors read the
//! default signed-out state, and idle entries are swept by [`SessionStore::evict_idle`].

use crate::models::{Profile, SessionToken, WeightSample};
use dashmap::DashMap;
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::AppState;

/// Cookie carrying the browser session id.
pub const SESSION_COOKIE: &str = "coach_session";

const SESSION_ID_BYTES: usize = 32;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Everything the page needs to render.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub session: Option<SessionToken>,
    pub profile: Option<Profile>,
    pub weight_samples: Vec<WeightSample>,
    /// Token value the most recent fetch was started for.
    fetched_for: Option<String>,
}

impl ViewState {
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Signed-out → signed-in. Replacing a token with a new value re-arms the fetch.
    pub fn sign_in(&mut self, token: SessionToken) {
        self.session = Some(token);
    }

    /// Returns the access token if data has not been fetched for it yet.
    pub fn needs_fetch(&self) -> Option<&str> {
        let token = self.session.as_ref()?;
        if self.fetched_for.as_deref() == Some(token.access_token.as_str()) {
            return None;
        }
        Some(&token.access_token)
    }

    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    /// Replaces, never merges.
    pub fn set_weight_samples(&mut self, samples: Vec<WeightSample>) {
        self.weight_samples = samples;
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.profile = None;
        self.weight_samples.clear();
        self.fetched_for = None;
    }
}

struct StoredView {
    view: ViewState,
    last_active: Instant,
}

impl Default for StoredView {
    fn default() -> Self {
        Self {
            view: ViewState::default(),
            last_active: Instant::now(),
        }
    }
}

/// In-memory map of browser session id → view state.
pub struct SessionStore {
    states: DashMap<String, StoredView>,
    rng: SystemRandom,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            states: DashMap::new(),
            rng: SystemRandom::new(),
        }
    }
}

impl SessionStore {
    /// Generate a fresh session id. Nothing is stored until the browser signs in.
    pub fn new_id(&self) -> anyhow::Result<String> {
        let mut bytes = [0u8; SESSION_ID_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| anyhow::anyhow!("System RNG unavailable"))?;
        Ok(hex::encode(bytes))
    }

    /// Whether `id` has the shape of an id produced by [`Self::new_id`].
    pub fn is_well_formed(id: &str) -> bool {
        id.len() == SESSION_ID_BYTES * 2 && id.bytes().all(|b| b.is_ascii_hexdigit())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Copy of the current state; unknown ids read as signed out.
    pub fn snapshot(&self, id: &str) -> ViewState {
        match self.states.get_mut(id) {
            Some(mut entry) => {
                entry.last_active = Instant::now();
                entry.view.clone()
            }
            None => ViewState::default(),
        }
    }

    /// Apply `f` to the state for `id`, creating it if needed.
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut entry = self.states.entry(id.to_string()).or_default();
        entry.last_active = Instant::now();
        f(&mut entry.view)
    }

    /// Apply `f` only if `id` is already stored.
    pub fn update_existing<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut ViewState) -> R,
    ) -> Option<R> {
        let mut entry = self.states.get_mut(id)?;
        entry.last_active = Instant::now();
        Some(f(&mut entry.view))
    }

    /// Claim the pending fetch for `id`, if any.
    ///
    /// Returns the token to fetch with and records it so the same token is
    /// never fetched twice.
    pub fn begin_fetch(&self, id: &str) -> Option<String> {
        self.update_existing(id, |state| {
            let token = state.needs_fetch()?.to_string();
            state.fetched_for = Some(token.clone());
            Some(token)
        })
        .flatten()
    }

    /// Drop every entry untouched for longer than `max_idle`.
    ///
    /// Returns the number of entries removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.states.len();
        self.states
            .retain(|_, entry| entry.last_active.elapsed() < max_idle);
        before.saturating_sub(self.states.len())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Periodically evict sessions idle longer than the configured timeout.
pub fn spawn_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let evicted = state.sessions.evict_idle(state.config.session_idle_timeout);
            if evicted > 0 {
                tracing::debug!(
                    evicted,
                    remaining = state.sessions.len(),
                    "Evicted idle sessions"
                );
            }
        }
    })
}
