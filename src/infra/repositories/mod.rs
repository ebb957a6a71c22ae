//! Repository layer - Data access abstraction
//!
//! Each store has a connection-backed read side (a trait, mockable in tests)
//! and a transaction-scoped side handed out by the unit of work.

mod audit_repository;
pub(crate) mod entities;
mod registration_repository;
mod user_repository;

pub use audit_repository::{AuditRepository, AuditStore, TxAuditRepository};
pub use registration_repository::{
    Decision, RegistrationRepository, RegistrationStore, TxRegistrationRepository,
};
pub use user_repository::{TxUserRepository, UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use audit_repository::MockAuditRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use registration_repository::MockRegistrationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
