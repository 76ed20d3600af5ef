//! Signed-in user: the OAuth token and the profile fetched with it.

use serde::{Deserialize, Serialize};

/// Profile returned by Google's user-info endpoint.
///
/// Only the fields the page displays are required; anything else in the
/// response is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Avatar URL
    pub picture: String,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
}

/// Access token issued by Google after a successful login.
///
/// Held in memory only, never persisted.
#[derive(Clone, PartialEq, Deserialize)]
pub struct SessionToken {
    pub access_token: String,
    /// Usually "Bearer"
    #[serde(default)]
    pub token_type: String,
    /// Lifetime in seconds from issue
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Space-separated scopes actually granted
    #[serde(default)]
    pub scope: Option<String>,
}

impl SessionToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_in: None,
            scope: None,
        }
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}
