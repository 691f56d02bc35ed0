//! Service Container - Centralized service access.
//!
//! Wires the concrete services over a single Unit of Work and hands them
//! out as trait objects.

use std::sync::Arc;

use super::{IdentityVerifier, JwtVerifier, UserManager, UserService};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get identity verifier
    fn identity(&self) -> Arc<dyn IdentityVerifier>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    identity: Arc<dyn IdentityVerifier>,
    user_service: Arc<dyn UserService>,
}

impl Services {
    /// Create a new service container from already built services
    pub fn new(identity: Arc<dyn IdentityVerifier>, user_service: Arc<dyn UserService>) -> Self {
        Self {
            identity,
            user_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let identity = Arc::new(JwtVerifier::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow));

        Self::new(identity, user_service)
    }
}

impl ServiceContainer for Services {
    fn identity(&self) -> Arc<dyn IdentityVerifier> {
        self.identity.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }
}
