//! services/web/src/bin/server.rs

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use web_lib::{
    adapters::{completion::DeepSeekClient, db::DbAdapter},
    config::Config,
    error::AppError,
    web::{build_router, state::AppState},
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let options = config
        .database_url
        .parse::<SqliteConnectOptions>()?
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await?;
    let db_adapter = DbAdapter::new(pool);
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize the Completion Client ---
    let completion = DeepSeekClient::new(
        config.completion_endpoint.clone(),
        config.completion_model.clone(),
        config.deepseek_api_key.clone(),
        config.request_timeout,
    )
    .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))?;

    // --- 4. Build the Shared AppState ---
    let state = Arc::new(AppState {
        credentials: Arc::new(db_adapter.clone()),
        sessions: Arc::new(db_adapter.clone()),
        conversations: Arc::new(db_adapter),
        completion: Arc::new(completion),
        tera: web_lib::web::state::load_templates()?,
        config: config.clone(),
    });

    // --- 5. Create the Router & Start the Server ---
    let app = build_router(state);
    info!(
        "Starting server on {} (rate-limit policy: {} per {:?})",
        config.bind_address, config.rate_limit.requests, config.rate_limit.per
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
