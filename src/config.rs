//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";
/// Stored sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_IDLE_SECS: u64 = 2 * 60 * 60;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Google OAuth client ID (public)
    pub google_client_id: String,
    /// Externally visible base URL of this service, used for the OAuth redirect
    pub public_url: String,
    /// Server port
    pub port: u16,
    /// Google consent screen
    pub google_auth_url: String,
    /// Google token endpoint
    pub google_token_url: String,
    /// Base for the user-info and fitness endpoints
    pub google_api_base: String,
    /// Idle time after which a stored browser session is evicted
    pub session_idle_timeout: Duration,

    // --- Secrets ---
    /// Google OAuth client secret
    pub google_client_secret: String,
    /// HMAC key for signing the OAuth state parameter (raw bytes)
    pub oauth_state_key: Vec<u8>,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test_client_id.apps.googleusercontent.com".to_string(),
            public_url: "http://localhost:8080".to_string(),
            port: 8080,
            google_auth_url: DEFAULT_AUTH_URL.to_string(),
            google_token_url: DEFAULT_TOKEN_URL.to_string(),
            google_api_base: DEFAULT_API_BASE.to_string(),
            session_idle_timeout: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
            google_client_secret: "test_secret".to_string(),
            oauth_state_key: b"test_state_key_32_bytes_minimum!".to_vec(),
        }
    }

    /// Point every Google endpoint at `base` (a fake server in tests).
    pub fn with_google_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.google_auth_url = format!("{}/o/oauth2/v2/auth", base);
        self.google_token_url = format!("{}/token", base);
        self.google_api_base = base.to_string();
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            public_url: env::var("PUBLIC_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            google_auth_url: env::var("GOOGLE_AUTH_URL")
                .unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string()),
            google_token_url: env::var("GOOGLE_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
            google_api_base: env::var("GOOGLE_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            session_idle_timeout: Duration::from_secs(
                env::var("SESSION_IDLE_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_SESSION_IDLE_SECS),
            ),

            google_client_secret: env::var("GOOGLE_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_SECRET"))?,
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map_err(|_| ConfigError::Missing("OAUTH_STATE_KEY"))?
                .into_bytes(),
        })
    }

    /// Whether the service is published over https.
    pub fn is_https(&self) -> bool {
        self.public_url.starts_with("https://")
    }

    /// Callback URL registered with Google.
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/google/callback", self.public_url)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
