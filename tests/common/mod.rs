// SPDX-License-Identifier: MIT

use jamvote::config::Config;
use jamvote::db::Db;
use jamvote::routes::create_router;
use jamvote::services::DiscordClient;
use jamvote::AppState;
use std::sync::Arc;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the test database and run migrations.
#[allow(dead_code)]
pub async fn test_db() -> Db {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
    Db::connect(&url)
        .await
        .expect("Failed to connect to test database")
}

/// Lazy pool that never actually connects. Good enough for routes that
/// are rejected before any query runs.
#[allow(dead_code)]
pub fn test_db_offline() -> Db {
    Db::connect_lazy("postgres://localhost/jamvote_offline").expect("Failed to build lazy pool")
}

/// Create a test app with an offline database.
/// Returns the router and the config it was built with.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Config) {
    let config = Config::test_default();
    create_test_app_with_db(config, test_db_offline())
}

/// Create a test app around an explicit database handle.
#[allow(dead_code)]
pub fn create_test_app_with_db(config: Config, db: Db) -> (axum::Router, Config) {
    let discord = DiscordClient::new(
        config.discord_client_id.clone(),
        config.discord_client_secret.clone(),
        config.discord_redirect_uri.clone(),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        discord,
    });

    (create_router(state), config)
}
