//! Admin command - operator provisioning of administrator accounts.
//!
//! Administrators are never created over HTTP.

use std::sync::Arc;

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::services::{IdentityManager, IdentityService, NewAdmin};

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let identity = IdentityManager::new(Arc::new(Persistence::new(db.get_connection())));

    match args.action {
        AdminAction::Create {
            email,
            phone,
            name,
            password,
            admin_role,
        } => {
            let admin = identity
                .create_admin(NewAdmin {
                    email,
                    phone,
                    full_name: name,
                    password,
                    admin_role,
                })
                .await?;

            println!(
                "Created {} administrator {} (id {})",
                admin_role, admin.email, admin.id
            );
        }
    }

    Ok(())
}
