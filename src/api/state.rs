//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{IdentityVerifier, ServiceContainer, Services, UserService};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Bearer credential verifier
    pub identity: Arc<dyn IdentityVerifier>,
    /// User directory service
    pub user_service: Arc<dyn UserService>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::new(container.identity(), container.users(), database)
    }

    /// Create new application state with manually injected services.
    pub fn new(
        identity: Arc<dyn IdentityVerifier>,
        user_service: Arc<dyn UserService>,
        database: Arc<Database>,
    ) -> Self {
        Self {
            identity,
            user_service,
            database,
        }
    }
}
