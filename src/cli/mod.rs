//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `jobs` - Notification worker and queue maintenance
//! - `admin` - Administrator provisioning

pub mod args;

pub use args::{Cli, Commands};
