// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth sign-in and sign-out routes.
//!
//! Sign-in failures never produce an error page: they are logged and the
//! browser lands back on `/` still signed out.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Extension, Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

use crate::error::{AppError, GoogleError, Result};
use crate::middleware::BrowserSession;
use crate::services::spawn_fetch;
use crate::AppState;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// How long a signed OAuth state stays valid.
pub const OAUTH_STATE_MAX_AGE_MILLIS: u128 = 10 * 60 * 1000;

/// Allowance for a state timestamp slightly ahead of our clock.
const OAUTH_STATE_CLOCK_SKEW_MILLIS: u128 = 60 * 1000;

fn now_millis() -> Option<u128> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis())
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/google", get(auth_start))
        .route("/auth/google/callback", get(auth_callback))
        .route("/auth/logout", post(logout))
}

/// Start OAuth flow - redirect to Google's consent screen.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<BrowserSession>,
) -> Result<Redirect> {
    let oauth_state = sign_state(&session.id, &state.config.oauth_state_key)?;
    let auth_url = state.google.authorize_url(&oauth_state);

    tracing::info!(
        client_id = %state.config.google_client_id,
        "Starting OAuth flow, redirecting to Google"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// OAuth callback - exchange code for a token and start the data fetch.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<BrowserSession>,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    let home = Redirect::to("/");

    // Check for OAuth errors (user cancelled, access denied, ...)
    if let Some(error) = params.error {
        let err = GoogleError::Auth(error);
        tracing::warn!(error = %err, "Login failed");
        return home;
    }

    let state_session = params
        .state
        .as_deref()
        .and_then(|s| verify_and_decode_state(s, &state.config.oauth_state_key));
    if state_session.as_deref() != Some(session.id.as_str()) {
        tracing::warn!("Login failed: OAuth state missing, tampered, or from another browser");
        return home;
    }

    let Some(code) = params.code else {
        tracing::warn!("Login failed: callback without authorization code");
        return home;
    };

    tracing::info!("Exchanging authorization code for token");

    let token = match state.google.exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            return home;
        }
    };

    tracing::info!(
        token_type = %token.token_type,
        expires_in = ?token.expires_in,
        "OAuth successful"
    );

    state.sessions.update(&session.id, |view| view.sign_in(token));
    spawn_fetch(state.clone(), session.id);

    home
}

/// Logout - drop the token and everything fetched with it.
async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<BrowserSession>,
) -> Redirect {
    state
        .sessions
        .update_existing(&session.id, |view| view.logout());
    tracing::info!("Signed out");
    Redirect::to("/")
}

/// Build the OAuth `state`: "session_id|timestamp_hex|signature_hex", base64url.
pub fn sign_state(session_id: &str, secret: &[u8]) -> Result<String> {
    let timestamp = now_millis()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("System time before epoch")))?;
    sign_state_at(session_id, secret, timestamp)
}

fn sign_state_at(session_id: &str, secret: &[u8], timestamp: u128) -> Result<String> {
    let payload = format!("{}|{:x}", session_id, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify the HMAC signature and age, and return the session id the state was issued to.
pub fn verify_and_decode_state(state: &str, secret: &[u8]) -> Option<String> {
    verify_state_at(state, secret, now_millis()?)
}

fn verify_state_at(state: &str, secret: &[u8], now: u128) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let session_id = parts[0];
    let timestamp_hex = parts[1];
    let signature_hex = parts[2];

    let payload = format!("{}|{}", session_id, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected_signature = hex::encode(mac.finalize().into_bytes());

    if !bool::from(signature_hex.as_bytes().ct_eq(expected_signature.as_bytes())) {
        tracing::error!("OAuth state signature mismatch! Potential tampering.");
        return None;
    }

    let issued = u128::from_str_radix(timestamp_hex, 16).ok()?;
    if now.saturating_sub(issued) > OAUTH_STATE_MAX_AGE_MILLIS
        || issued.saturating_sub(now) > OAUTH_STATE_CLOCK_SKEW_MILLIS
    {
        tracing::warn!("OAuth state expired or issued in the future");
        return None;
    }

    Some(session_id.to_string())
}
