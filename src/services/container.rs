//! Service Container - centralized service access.
//!
//! Handlers depend on the [`ServiceContainer`] trait; [`Services`] wires the
//! concrete implementations around one shared [`Persistence`].

use std::sync::Arc;

use super::{
    ApprovalEngine, ApprovalService, AuditService, AuditTrail, AuthService, Authenticator,
    IdentityManager, IdentityService, Notifier, RegistrationLedger, RegistrationService,
};
use crate::config::Config;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn identity(&self) -> Arc<dyn IdentityService>;

    fn registrations(&self) -> Arc<dyn RegistrationService>;

    fn approvals(&self) -> Arc<dyn ApprovalService>;

    fn audit(&self) -> Arc<dyn AuditService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    identity_service: Arc<dyn IdentityService>,
    registration_service: Arc<dyn RegistrationService>,
    approval_service: Arc<dyn ApprovalService>,
    audit_service: Arc<dyn AuditService>,
}

impl Services {
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        identity_service: Arc<dyn IdentityService>,
        registration_service: Arc<dyn RegistrationService>,
        approval_service: Arc<dyn ApprovalService>,
        audit_service: Arc<dyn AuditService>,
    ) -> Self {
        Self {
            auth_service,
            identity_service,
            registration_service,
            approval_service,
            audit_service,
        }
    }

    /// Wire every service over one database connection.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        let registration_service: Arc<dyn RegistrationService> =
            Arc::new(RegistrationLedger::new(uow.clone()));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            identity_service: Arc::new(IdentityManager::new(uow.clone())),
            approval_service: Arc::new(ApprovalEngine::new(
                uow.clone(),
                registration_service.clone(),
                notifier,
            )),
            audit_service: Arc::new(AuditTrail::new(uow)),
            registration_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn identity(&self) -> Arc<dyn IdentityService> {
        self.identity_service.clone()
    }

    fn registrations(&self) -> Arc<dyn RegistrationService> {
        self.registration_service.clone()
    }

    fn approvals(&self) -> Arc<dyn ApprovalService> {
        self.approval_service.clone()
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        self.audit_service.clone()
    }
}
