// SPDX-License-Identifier: MIT

//! Jamvote API server.
//!
//! Backend for the community game-jam theme vote: Discord OAuth login,
//! cookie sessions, and one vote per user per voting period.

use jamvote::{config::Config, db::Db, services::DiscordClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Jamvote API");

    // Connect to Postgres and apply pending migrations
    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected, migrations applied");

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

    let app = jamvote::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jamvote=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
