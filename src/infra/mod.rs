//! Infrastructure layer - External systems integration
//!
//! - Database connection and migrations
//! - Repositories (read side and transaction-scoped side)
//! - Unit of Work for transaction management

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AuditRepository, AuditStore, Decision, RegistrationRepository, RegistrationStore,
    TxAuditRepository, TxRegistrationRepository, TxUserRepository, UserRepository, UserStore,
};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockAuditRepository, MockRegistrationRepository, MockUserRepository};
