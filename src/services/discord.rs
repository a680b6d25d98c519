// SPDX-License-Identifier: MIT

//! Discord API client for the OAuth2 code exchange and identity lookup.
//!
//! Two sequential calls per login: exchange the authorization code for
//! an access token, then fetch `/users/@me` with it. No retries; a
//! failure at either step aborts the login.

use crate::error::AppError;
use serde::Deserialize;
use std::time::Duration;

/// Timeout for every Discord request. Without this a slow provider
/// response would hold the login request open without bound.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Discord API client.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl DiscordClient {
    /// Create a new Discord client with OAuth credentials.
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: "https://discord.com/api".to_string(),
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Build the authorization URL the browser is redirected to.
    pub fn authorize_url(&self, oauth_state: &str) -> String {
        format!(
            "https://discord.com/oauth2/authorize?\
             client_id={}&\
             response_type=code&\
             redirect_uri={}&\
             scope=identify&\
             state={}",
            self.client_id,
            urlencoding::encode(&self.redirect_uri),
            oauth_state
        )
    }

    /// Exchange an authorization code for an access token.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AppError> {
        let url = format!("{}/oauth2/token", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::DiscordApi(format!("Token exchange request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Fetch the authenticated user's identity profile.
    pub async fn get_identity(&self, access_token: &str) -> Result<DiscordUser, AppError> {
        let url = format!("{}/users/@me", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::DiscordApi(format!("Identity request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::DiscordApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::DiscordApi(format!("JSON parse error: {}", e)))
    }
}

/// Token response from Discord's OAuth2 token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Identity fields from `/users/@me` (scope `identify`).
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    /// Snowflake ID as a string
    pub id: String,
    pub username: String,
    /// Avatar hash; None when the user has the default avatar
    pub avatar: Option<String>,
}
