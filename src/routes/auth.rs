// SPDX-License-Identifier: MIT

//! Discord OAuth authentication routes.
//!
//! Login redirects the browser to Discord with an HMAC-signed `state`
//! parameter; the callback exchanges the code, upserts the user, and
//! sets the session cookie before redirecting back to the frontend.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_session_jwt, SESSION_COOKIE};
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/discord/login", get(login))
        .route("/auth/discord/callback", get(callback))
        .route("/auth/logout", post(logout))
}

/// Start the OAuth flow: redirect to Discord's authorization page.
async fn login(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let oauth_state = sign_oauth_state(&state.config.frontend_url, &state.config.oauth_state_key)?;
    let url = state.discord.authorize_url(&oauth_state);

    tracing::info!(
        client_id = %state.config.discord_client_id,
        "Starting OAuth flow, redirecting to Discord"
    );

    Ok(Redirect::temporary(&url))
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

/// OAuth callback: exchange the code, upsert the user, set the session
/// cookie, redirect to the frontend.
async fn callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    // Recover the frontend URL from the signed state parameter, falling
    // back to the configured one if the state is missing or tampered.
    let frontend_url = params
        .state
        .as_deref()
        .and_then(|s| verify_oauth_state(s, &state.config.oauth_state_key))
        .unwrap_or_else(|| {
            tracing::warn!("Missing or invalid OAuth state, using configured frontend URL");
            state.config.frontend_url.clone()
        });

    // User denied the authorization, or Discord reported an error.
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OAuth error from Discord");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = match params.code.as_deref() {
        Some(code) if !code.is_empty() => code,
        _ => return Err(AppError::BadRequest("No code provided".to_string())),
    };

    tracing::info!("Exchanging authorization code for access token");
    let token = state.discord.exchange_code(code).await?;
    let identity = state.discord.get_identity(&token.access_token).await?;

    let user = state
        .db
        .upsert_user(&identity.id, &identity.username, identity.avatar.as_deref())
        .await?;

    tracing::info!(
        discord_id = %user.discord_id,
        username = %user.username,
        "OAuth successful, user stored"
    );

    let jwt = create_session_jwt(&user.discord_id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    let jar = jar.add(session_cookie(jwt, state.config.production));

    Ok((jar, Redirect::temporary(&frontend_url)))
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub message: String,
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    let jar = jar.remove(cookie);

    (
        jar,
        Json(LogoutResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
}

/// Build the session cookie.
///
/// The frontend lives on a different origin in production, so the
/// cookie must be `SameSite=None` (which requires `Secure`) there;
/// local development uses `Lax` over plain HTTP.
fn session_cookie(token: String, production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .secure(production)
        .same_site(if production {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .max_age(time::Duration::days(1))
        .build()
}

/// Sign the frontend URL and a timestamp into the OAuth state parameter.
///
/// Format before base64url encoding: `frontend_url|timestamp_hex|signature_hex`.
fn sign_oauth_state(frontend_url: &str, secret: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(URL_SAFE_NO_PAD.encode(format!("{}|{}", payload, signature).as_bytes()))
}

/// Verify the HMAC signature and recover the frontend URL from the
/// OAuth state parameter. Returns None on any mismatch.
fn verify_oauth_state(state: &str, secret: &[u8]) -> Option<String> {
    let bytes = URL_SAFE_NO_PAD.decode(state).ok()?;
    let state_str = String::from_utf8(bytes).ok()?;

    let parts: Vec<&str> = state_str.splitn(3, '|').collect();
    if parts.len() != 3 {
        return None;
    }

    let (frontend_url, timestamp_hex, signature_hex) = (parts[0], parts[1], parts[2]);

    let payload = format!("{}|{}", frontend_url, timestamp_hex);

    let mut mac = HmacSha256::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    if signature_hex != expected {
        tracing::error!("OAuth state signature mismatch, possible tampering");
        return None;
    }

    Some(frontend_url.to_string())
}
