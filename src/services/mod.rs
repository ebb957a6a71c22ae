//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain rules and infrastructure through the Unit of
//! Work and are consumed through traits, so handlers and tests can swap
//! implementations.

mod approval_service;
mod audit_service;
mod auth_service;
pub mod container;
mod identity_service;
mod notifier;
mod registration_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use container::{ServiceContainer, Services};

pub use approval_service::{ApprovalEngine, ApprovalService, ApproveDecision, RejectDecision};
pub use audit_service::{AuditService, AuditTrail};
pub use auth_service::{AuthService, Authenticator, Claims, Registration, TokenResponse};
pub use identity_service::{IdentityManager, IdentityService, NewAdmin};
pub use notifier::{LogNotifier, Notifier, QueueNotifier};
pub use registration_service::{RegistrationLedger, RegistrationService};

#[cfg(any(test, feature = "test-utils"))]
pub use approval_service::MockApprovalService;
#[cfg(any(test, feature = "test-utils"))]
pub use audit_service::MockAuditService;
#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use identity_service::MockIdentityService;
#[cfg(any(test, feature = "test-utils"))]
pub use notifier::MockNotifier;
#[cfg(any(test, feature = "test-utils"))]
pub use registration_service::MockRegistrationService;
