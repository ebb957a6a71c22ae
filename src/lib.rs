//! Farmgate - seller onboarding and approval backend for an agricultural
//! marketplace.
//!
//! Buyers apply to sell by filing a registration request with their farm
//! details. Administrators review the queue and approve, reject or reopen
//! requests, and can later suspend or reinstate sellers. Every
//! administrative decision lands in the audit log in the same transaction
//! as the state change it describes.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, roles, registration requests, audit entries
//! - **services**: Use cases (submission, review, standing, audit)
//! - **infra**: Database, repositories and the unit of work
//! - **jobs**: Background notification delivery
//! - **api**: HTTP handlers, middleware, and routes
//! - **types**: Shared types (pagination)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! farmgate serve
//!
//! # Run migrations
//! farmgate migrate up
//!
//! # Provision the first administrator
//! farmgate admin create --email ops@example.com --phone +15550100 \
//!     --name "Ops" --password '...' --admin-role super_admin
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, AdminRole, RegistrationRequest, RequestStatus, Role, SellerStatus, User};
pub use errors::{AppError, AppResult};
