//! Application state shared by every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{Notifier, ServiceContainer, Services};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Used by the health check
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the production service container over `database`.
    pub fn from_config(database: Arc<Database>, config: Config, notifier: Arc<dyn Notifier>) -> Self {
        let services = Services::from_connection(database.get_connection(), config, notifier);
        Self::new(Arc::new(services), database)
    }

    /// Build state around an arbitrary container (tests, alternative wiring).
    pub fn new(services: Arc<dyn ServiceContainer>, database: Arc<Database>) -> Self {
        Self { services, database }
    }
}
