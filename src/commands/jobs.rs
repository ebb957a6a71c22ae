//! Jobs command - Notification queue management.
//!
//! Provides CLI commands to manage the notification queue:
//! - `work`: Start the notification worker
//! - `list`: Show pending/failed jobs
//! - `clear`: Remove failed jobs from the queue
//!
//! ## Usage
//!
//! ```bash
//! # Start the notification worker
//! farmgate jobs work
//!
//! # List job queue status
//! farmgate jobs list
//!
//! # Clear failed jobs
//! farmgate jobs clear
//! ```

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::{
    Config, JOB_NAME_NOTIFICATION, JOB_QUEUE_MAX_CONNECTIONS, NOTIFICATION_WORKER_NAME,
};
use crate::errors::{AppError, AppResult};

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    match args.action {
        JobsAction::Work => run_worker(&config).await,
        JobsAction::List => list_jobs(&config).await,
        JobsAction::Clear => clear_failed_jobs(&config).await,
    }
}

/// Start the notification worker
///
/// Drains approval and rejection notices queued by the API server.
async fn run_worker(config: &Config) -> AppResult<()> {
    use apalis::prelude::*;
    use apalis_sql::postgres::PostgresStorage;
    use apalis_sql::sqlx::postgres::PgPoolOptions;

    use crate::jobs::{notification_job_handler, NotificationJob};

    tracing::info!("Connecting to database for job worker...");

    // Create connection pool
    let pool = PgPoolOptions::new()
        .max_connections(JOB_QUEUE_MAX_CONNECTIONS)
        .connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    // Run migrations for apalis tables first (associated function on pool)
    PostgresStorage::setup(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

    let storage: PostgresStorage<NotificationJob> =
        PostgresStorage::new_with_config(pool, apalis_sql::Config::new(JOB_NAME_NOTIFICATION));

    tracing::info!("Notification worker started. Press Ctrl+C to stop.");

    let worker = WorkerBuilder::new(NOTIFICATION_WORKER_NAME)
        .backend(storage)
        .build_fn(notification_job_handler);

    // Run with graceful shutdown on Ctrl+C
    let monitor = Monitor::new().register(worker);

    tokio::select! {
        result = monitor.run() => {
            if let Err(e) = result {
                tracing::error!("Worker error: {}", e);
                return Err(AppError::internal(format!("Worker failed: {}", e)));
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping worker...");
        }
    }

    tracing::info!("Notification worker stopped.");
    Ok(())
}

/// Connect to the queue database and report whether apalis has set up its schema.
async fn open_queue(config: &Config) -> AppResult<Option<sea_orm::DatabaseConnection>> {
    use sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};

    let db = Database::connect(&config.database_url)
        .await
        .map_err(|e| AppError::internal(format!("Failed to connect to database: {}", e)))?;

    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Postgres,
            "SELECT EXISTS(SELECT 1 FROM information_schema.schemata WHERE schema_name = 'apalis') AS exists",
        ))
        .await
        .map_err(|e| AppError::internal(format!("Query failed: {}", e)))?;

    let initialized = row
        .and_then(|r| r.try_get::<bool>("", "exists").ok())
        .unwrap_or(false);

    Ok(initialized.then_some(db))
}

/// Show queued notification counts by status
async fn list_jobs(config: &Config) -> AppResult<()> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let Some(db) = open_queue(config).await? else {
        println!("Notification queue not initialized. Run 'jobs work' or enable NOTIFICATION_QUEUE first.");
        return Ok(());
    };

    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Postgres,
            format!(
                "SELECT status::text AS status, COUNT(*)::bigint AS count FROM apalis.jobs WHERE job_type = '{}' GROUP BY status",
                JOB_NAME_NOTIFICATION
            ),
        ))
        .await
        .map_err(|e| AppError::internal(format!("Query failed: {}", e)))?;

    println!("\n=== Notification Queue ===");
    if rows.is_empty() {
        println!("No jobs queued.");
    }
    for row in rows {
        if let (Ok(status), Ok(count)) = (
            row.try_get::<String>("", "status"),
            row.try_get::<i64>("", "count"),
        ) {
            println!("{:<9} {}", format!("{}:", status), count);
        }
    }
    println!("==========================\n");

    Ok(())
}

/// Clear failed notification jobs from the queue
async fn clear_failed_jobs(config: &Config) -> AppResult<()> {
    use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

    let Some(db) = open_queue(config).await? else {
        println!("Notification queue not initialized. Nothing to clear.");
        return Ok(());
    };

    let result = db
        .execute(Statement::from_string(
            DatabaseBackend::Postgres,
            format!(
                "DELETE FROM apalis.jobs WHERE status = 'Failed' AND job_type = '{}'",
                JOB_NAME_NOTIFICATION
            ),
        ))
        .await
        .map_err(|e| AppError::internal(format!("Failed to clear jobs: {}", e)))?;

    tracing::info!(cleared = result.rows_affected(), "Cleared failed notification jobs");
    println!("Cleared {} failed job(s) from the queue.", result.rows_affected());

    Ok(())
}
