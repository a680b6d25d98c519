//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord OAuth client ID (public)
    pub discord_client_id: String,
    /// Discord OAuth client secret
    pub discord_client_secret: String,
    /// Redirect URI registered with Discord for the OAuth callback
    pub discord_redirect_uri: String,
    /// Frontend origin for post-login redirects and CORS
    pub frontend_url: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for the signed OAuth state parameter
    pub oauth_state_key: Vec<u8>,
    /// Postgres connection string
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Production mode toggles the session cookie to `Secure` + `SameSite=None`
    pub production: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if present, so local development
    /// does not need anything exported in the shell.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();

        // A dedicated state key is optional; the JWT key is reused when unset.
        let oauth_state_key = env::var("OAUTH_STATE_KEY")
            .map(String::into_bytes)
            .unwrap_or_else(|_| jwt_signing_key.clone());

        Ok(Self {
            discord_client_id: env::var("DISCORD_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("DISCORD_CLIENT_ID"))?,
            discord_client_secret: env::var("DISCORD_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("DISCORD_CLIENT_SECRET"))?,
            discord_redirect_uri: env::var("DISCORD_REDIRECT_URI")
                .map_err(|_| ConfigError::Missing("DISCORD_REDIRECT_URI"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_signing_key,
            oauth_state_key,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .unwrap_or(4000),
            production: env::var("APP_ENV").map(|v| v == "production").unwrap_or(false),
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            discord_client_id: "test_client_id".to_string(),
            discord_client_secret: "test_secret".to_string(),
            discord_redirect_uri: "http://localhost:4000/auth/discord/callback".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            oauth_state_key: b"test_state_key".to_vec(),
            database_url: "postgres://localhost/jamvote_test".to_string(),
            port: 4000,
            production: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
