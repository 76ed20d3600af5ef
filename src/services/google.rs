// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google OAuth and Fitness API client.
//!
//! Handles:
//! - Building the consent URL with the fixed scope set
//! - Exchanging an authorization code for an access token
//! - Fetching the user-info profile
//! - Querying aggregated weight data

use crate::config::Config;
use crate::error::GoogleError;
use crate::models::{AggregateRequest, AggregateResponse, Profile, SessionToken};
use serde::Deserialize;

/// Scopes requested at login. The fitness write scopes are requested but
/// never used by this app.
pub const OAUTH_SCOPES: &[&str] = &[
    "openid",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/fitness.body.write",
    "https://www.googleapis.com/auth/fitness.nutrition.write",
    "https://www.googleapis.com/auth/fitness.body.read",
    "https://www.googleapis.com/auth/fitness.nutrition.read",
    "https://www.googleapis.com/auth/fitness.activity.read",
    "https://www.googleapis.com/auth/fitness.location.read",
];

/// Space-separated scope string as sent to Google.
pub fn scope_string() -> String {
    OAUTH_SCOPES.join(" ")
}

/// Google API client.
#[derive(Clone)]
pub struct GoogleClient {
    http: reqwest::Client,
    auth_url: String,
    token_url: String,
    api_base: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
            api_base: config.google_api_base.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            redirect_uri: config.redirect_uri(),
        }
    }

    /// Consent screen URL carrying the signed `state`.
    pub fn authorize_url(&self, oauth_state: &str) -> String {
        format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scope_string()),
            urlencoding::encode(oauth_state),
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<SessionToken, GoogleError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                GoogleError::Network(format!("Token exchange failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Google token exchange failed");
            return Err(GoogleError::Auth(format!(
                "Token exchange failed with status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GoogleError::Malformed(format!("Failed to parse token response: {}", e)))
    }

    /// GET the user-info profile for `access_token`.
    pub async fn get_profile(&self, access_token: &str) -> Result<Profile, GoogleError> {
        let url = format!("{}/oauth2/v1/userinfo", self.api_base);

        let response = self
            .http
            .get(&url)
            .query(&[("access_token", access_token)])
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                GoogleError::Network(e.without_url().to_string()).redact(access_token)
            })?;

        check_response_json(response)
            .await
            .map_err(|e| e.redact(access_token))
    }

    /// POST an aggregate query for daily weight summaries.
    pub async fn aggregate(
        &self,
        access_token: &str,
        body: &AggregateRequest,
    ) -> Result<AggregateResponse, GoogleError> {
        let url = format!("{}/fitness/v1/users/me/dataset:aggregate", self.api_base);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                GoogleError::Network(e.without_url().to_string()).redact(access_token)
            })?;

        check_response_json(response)
            .await
            .map_err(|e| e.redact(access_token))
    }
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, GoogleError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(GoogleError::Network(format!("HTTP {}: {}", status, body)));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| GoogleError::Network(e.without_url().to_string()))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| GoogleError::Malformed(format!("JSON parse error: {}", e)))
}
