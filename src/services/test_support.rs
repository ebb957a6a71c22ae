//! Unit-test unit of work: mocked read repositories, no transactions.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::infra::{
    AuditRepository, MockAuditRepository, MockRegistrationRepository, MockUserRepository,
    RegistrationRepository, TransactionContext, TxFuture, UnitOfWork, UserRepository,
};

/// Read calls go to mockall mocks; opening a transaction is counted and
/// fails, so tests can assert that a rejected call never reached storage.
pub struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    registrations: Arc<MockRegistrationRepository>,
    audit_log: Arc<MockAuditRepository>,
    transactions: AtomicUsize,
}

impl TestUnitOfWork {
    pub fn new() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            registrations: Arc::new(MockRegistrationRepository::new()),
            audit_log: Arc::new(MockAuditRepository::new()),
            transactions: AtomicUsize::new(0),
        }
    }

    pub fn with_users(mut self, users: MockUserRepository) -> Self {
        self.users = Arc::new(users);
        self
    }

    pub fn with_registrations(mut self, registrations: MockRegistrationRepository) -> Self {
        self.registrations = Arc::new(registrations);
        self
    }

    pub fn with_audit_log(mut self, audit_log: MockAuditRepository) -> Self {
        self.audit_log = Arc::new(audit_log);
        self
    }

    pub fn transactions_opened(&self) -> usize {
        self.transactions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn registrations(&self) -> Arc<dyn RegistrationRepository> {
        self.registrations.clone()
    }

    fn audit_log(&self) -> Arc<dyn AuditRepository> {
        self.audit_log.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        Err(AppError::internal("transactions are not available in unit tests"))
    }
}
