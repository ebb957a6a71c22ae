//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

use crate::domain::AdminRole;

/// Farmgate - seller onboarding backend for an agricultural marketplace
#[derive(Parser, Debug)]
#[command(name = "farmgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage background jobs
    Jobs(JobsArgs),

    /// Provision administrator accounts
    Admin(AdminArgs),
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to, overrides SERVER_HOST
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on, overrides SERVER_PORT
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// Arguments for the jobs command
#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

/// Job management actions
#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Start the notification worker
    Work,
    /// List queued jobs by status
    List,
    /// Clear failed jobs
    Clear,
}

/// Arguments for the admin command
#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Administrator management actions
#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// Create an administrator account
    Create {
        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// Full name
        #[arg(long)]
        name: String,

        #[arg(long, env = "FARMGATE_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,

        /// super_admin, seller_manager, price_manager or order_manager
        #[arg(long)]
        admin_role: AdminRole,
    },
}
