//! Vote model and tally types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The active voting period. Bump this when a new jam's theme vote opens.
pub const CURRENT_VOTING_PERIOD: i32 = 1;

/// Vote row. The `(user_id, voting_period_id)` pair is unique, so a user
/// holds at most one vote per period; re-casting overwrites in place.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Uuid,
    pub voting_period_id: i32,
    pub theme: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-theme vote count for the public tally.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ThemeCount {
    pub theme: String,
    pub count: i64,
}
