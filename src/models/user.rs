//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User row, created on the first successful Discord OAuth callback
/// and refreshed (username/avatar) on every subsequent one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    /// Stable Discord user ID (the OAuth subject)
    pub discord_id: String,
    pub username: String,
    /// Discord avatar hash, if the user has one set
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
