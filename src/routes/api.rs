// SPDX-License-Identifier: MIT

//! Voting and user API routes.
//!
//! The tally and user count are public; everything touching the
//! caller's identity or vote goes through the auth middleware.

use crate::error::{AppError, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::{ThemeCount, User, CURRENT_VOTING_PERIOD};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Public routes (no auth required).
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/countUsers", get(count_users))
        .route("/getVotes", get(get_votes))
}

/// Protected routes (require authentication via session cookie).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user/me", get(get_me))
        .route("/votes/current", get(get_current_vote))
        .route("/votes", post(cast_vote))
        .route("/votes/reset/{jam_id}", delete(reset_votes))
}

// ─── Public ──────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountUsersResponse {
    pub success: bool,
    pub user_count: i64,
}

/// Total number of registered users.
async fn count_users(State(state): State<Arc<AppState>>) -> Result<Json<CountUsersResponse>> {
    let user_count = state.db.count_users().await?;

    Ok(Json(CountUsersResponse {
        success: true,
        user_count,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResponse {
    pub success: bool,
    pub vote_counts: Vec<ThemeCount>,
    pub total_votes: i64,
}

/// Tally for the current voting period, grouped by theme.
async fn get_votes(State(state): State<Arc<AppState>>) -> Result<Json<TallyResponse>> {
    let (vote_counts, total_votes) = state.db.get_tally(CURRENT_VOTING_PERIOD).await?;

    Ok(Json(TallyResponse {
        success: true,
        vote_counts,
        total_votes,
    }))
}

// ─── Protected ───────────────────────────────────────────────

/// Echo the resolved user.
async fn get_me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentVoteResponse {
    pub has_voted: bool,
    pub selected_theme: Option<String>,
}

/// The calling user's vote state in the current period.
async fn get_current_vote(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<CurrentVoteResponse>> {
    let vote = state.db.get_user_vote(user.id, CURRENT_VOTING_PERIOD).await?;

    Ok(Json(CurrentVoteResponse {
        has_voted: vote.is_some(),
        selected_theme: vote.map(|v| v.theme),
    }))
}

#[derive(Deserialize)]
pub struct CastVoteRequest {
    theme: String,
}

#[derive(Serialize)]
pub struct CastVoteResponse {
    pub success: bool,
    pub theme: String,
}

/// Cast or change the caller's vote in the current period.
async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CastVoteRequest>,
) -> Result<Json<CastVoteResponse>> {
    let theme = body.theme.trim();
    if theme.is_empty() {
        return Err(AppError::BadRequest("Theme must not be empty".to_string()));
    }

    let recorded = state
        .db
        .cast_vote(user.id, CURRENT_VOTING_PERIOD, theme)
        .await?;

    tracing::info!(
        discord_id = %user.discord_id,
        theme = %recorded,
        "Vote recorded"
    );

    Ok(Json(CastVoteResponse {
        success: true,
        theme: recorded,
    }))
}

#[derive(Serialize)]
pub struct ResetVotesResponse {
    pub success: bool,
    pub message: String,
}

/// Reset all votes for a jam's voting period.
///
/// TODO: gate this behind an admin flag on the user record; today any
/// authenticated user can reach it, matching the current deployment.
async fn reset_votes(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(jam_id): Path<i32>,
) -> Result<Json<ResetVotesResponse>> {
    let deleted = state.db.reset_votes(jam_id).await?;

    tracing::info!(
        discord_id = %user.discord_id,
        jam_id,
        deleted,
        "Votes reset"
    );

    Ok(Json(ResetVotesResponse {
        success: true,
        message: format!("Reset {} votes for jam {}", deleted, jam_id),
    }))
}
