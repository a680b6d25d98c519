// SPDX-License-Identifier: MIT

//! Database layer (Postgres via sqlx).
//!
//! All single-vote-per-period correctness lives here: `cast_vote` is one
//! atomic upsert against the `(user_id, voting_period_id)` unique
//! constraint, so concurrent casts by the same user can never produce
//! two rows.

use crate::error::AppError;
use crate::models::{ThemeCount, User, Vote};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

/// Database handle wrapping a connection pool. Cheap to clone.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connect to Postgres and run any pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .min_connections(2)
            .max_connections(10)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Build a lazy pool that only connects on first use.
    ///
    /// Used by tests that exercise the router without a live database.
    pub fn connect_lazy(database_url: &str) -> Result<Self, sqlx::Error> {
        Ok(Self {
            pool: PgPool::connect_lazy(database_url)?,
        })
    }

    // ─── Users ───────────────────────────────────────────────

    /// Total number of registered users.
    pub async fn count_users(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Look up a user by their Discord ID.
    pub async fn find_user_by_discord_id(&self, discord_id: &str) -> Result<Option<User>, AppError> {
        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT id, discord_id, username, avatar, created_at, updated_at
            FROM users
            WHERE discord_id = $1
            "#,
        )
        .bind(discord_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Create or refresh a user keyed by Discord ID.
    ///
    /// Idempotent: repeated callbacks for the same Discord ID always map
    /// to the same `users.id`; only username/avatar/updated_at change.
    pub async fn upsert_user(
        &self,
        discord_id: &str,
        username: &str,
        avatar: Option<&str>,
    ) -> Result<User, AppError> {
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (discord_id, username, avatar)
            VALUES ($1, $2, $3)
            ON CONFLICT (discord_id) DO UPDATE
            SET username = EXCLUDED.username,
                avatar = EXCLUDED.avatar,
                updated_at = now()
            RETURNING id, discord_id, username, avatar, created_at, updated_at
            "#,
        )
        .bind(discord_id)
        .bind(username)
        .bind(avatar)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    // ─── Votes ───────────────────────────────────────────────

    /// Tally for a voting period: per-theme counts (descending) and the
    /// total number of votes cast.
    pub async fn get_tally(&self, period: i32) -> Result<(Vec<ThemeCount>, i64), AppError> {
        let counts: Vec<ThemeCount> = sqlx::query_as(
            r#"
            SELECT theme, COUNT(*) AS count
            FROM votes
            WHERE voting_period_id = $1
            GROUP BY theme
            ORDER BY count DESC, theme ASC
            "#,
        )
        .bind(period)
        .fetch_all(&self.pool)
        .await?;

        let total = counts.iter().map(|c| c.count).sum();

        Ok((counts, total))
    }

    /// The calling user's vote in a period, if any.
    pub async fn get_user_vote(&self, user_id: Uuid, period: i32) -> Result<Option<Vote>, AppError> {
        let vote: Option<Vote> = sqlx::query_as(
            r#"
            SELECT id, user_id, voting_period_id, theme, created_at, updated_at
            FROM votes
            WHERE user_id = $1 AND voting_period_id = $2
            "#,
        )
        .bind(user_id)
        .bind(period)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vote)
    }

    /// Cast or change a vote. Overwrite policy: a second cast in the same
    /// period replaces the first and bumps `updated_at`.
    pub async fn cast_vote(&self, user_id: Uuid, period: i32, theme: &str) -> Result<String, AppError> {
        let recorded: String = sqlx::query_scalar(
            r#"
            INSERT INTO votes (user_id, voting_period_id, theme)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, voting_period_id) DO UPDATE
            SET theme = EXCLUDED.theme,
                updated_at = now()
            RETURNING theme
            "#,
        )
        .bind(user_id)
        .bind(period)
        .bind(theme)
        .fetch_one(&self.pool)
        .await?;

        Ok(recorded)
    }

    /// Delete every vote in a period. Returns the number of rows removed.
    pub async fn reset_votes(&self, period: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM votes WHERE voting_period_id = $1")
            .bind(period)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
