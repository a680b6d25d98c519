// SPDX-License-Identifier: MIT

//! Jamvote: backend API for a community game-jam theme vote.
//!
//! Users authenticate with Discord OAuth2, receive a session token in an
//! HTTP-only cookie, and cast at most one vote per voting period.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Db;
use services::DiscordClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub discord: DiscordClient,
}
