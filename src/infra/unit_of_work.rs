//! Unit of Work: repository access plus the transaction boundary.
//!
//! Every workflow transition (user standing, ledger row, audit entry) runs
//! inside a single [`UnitOfWork::transaction`] call and commits or rolls back
//! as a whole.

use async_trait::async_trait;
use sea_orm::{
    AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::{
    AuditRepository, AuditStore, RegistrationRepository, RegistrationStore, TxAuditRepository,
    TxRegistrationRepository, TxUserRepository, UserRepository, UserStore,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because `transaction` is generic; unit tests supply
/// their own implementation and integration tests use [`Persistence`] over
/// an in-memory database.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;

    fn registrations(&self) -> Arc<dyn RegistrationRepository>;

    fn audit_log(&self) -> Arc<dyn AuditRepository>;

    /// Execute a closure within a read-committed transaction.
    ///
    /// Commits when the closure returns `Ok`, rolls back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one open transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }

    pub fn registrations(&self) -> TxRegistrationRepository<'_> {
        TxRegistrationRepository::new(self.txn)
    }

    pub fn audit_log(&self) -> TxAuditRepository<'_> {
        TxAuditRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
    registration_repo: Arc<RegistrationStore>,
    audit_repo: Arc<AuditStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            registration_repo: Arc::new(RegistrationStore::new(db.clone())),
            audit_repo: Arc::new(AuditStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn registrations(&self) -> Arc<dyn RegistrationRepository> {
        self.registration_repo.clone()
    }

    fn audit_log(&self) -> Arc<dyn AuditRepository> {
        self.audit_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(
                Some(IsolationLevel::ReadCommitted),
                Some(AccessMode::ReadWrite),
            )
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Run a block inside a transaction.
///
/// ```ignore
/// let user = with_transaction!(uow, |ctx| ctx.users().create(new_user).await)?;
/// ```
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
