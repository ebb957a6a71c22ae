//! Serve command - Starts the HTTP server.

use std::sync::Arc;
use std::time::Duration;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, JOB_NAME_NOTIFICATION, JOB_QUEUE_MAX_CONNECTIONS};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{LogNotifier, Notifier, QueueNotifier};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    tracing::info!("Database connected");

    let notifier = build_notifier(&config).await?;

    let host = args.host.unwrap_or_else(|| config.server_host.clone());
    let port = args.port.unwrap_or(config.server_port);
    let request_timeout = Duration::from_secs(config.request_timeout_secs);

    let app_state = AppState::from_config(Arc::new(db), config, notifier);
    let app = create_router(app_state, request_timeout);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

/// Queue notifications for the worker when enabled, otherwise log them inline.
async fn build_notifier(config: &Config) -> AppResult<Arc<dyn Notifier>> {
    use apalis_sql::postgres::PostgresStorage;
    use apalis_sql::sqlx::postgres::PgPoolOptions;

    if !config.notification_queue {
        tracing::info!("Notification queue disabled, logging notifications");
        return Ok(Arc::new(LogNotifier));
    }

    let pool = PgPoolOptions::new()
        .max_connections(JOB_QUEUE_MAX_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect job queue: {}", e)))?;

    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    tracing::info!("Notification queue connected");
    Ok(Arc::new(QueueNotifier::new(
        PostgresStorage::new_with_config(pool, apalis_sql::Config::new(JOB_NAME_NOTIFICATION)),
        config.mail_from.clone(),
    )))
}
