//! Read access to the administrative audit trail.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{Actor, AuditLogEntry, Capability};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditService: Send + Sync {
    /// Newest entries first
    async fn list(
        &self,
        actor: Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<AuditLogEntry>>;
}

pub struct AuditTrail<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AuditTrail<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuditService for AuditTrail<U> {
    async fn list(
        &self,
        actor: Actor,
        params: PaginationParams,
    ) -> AppResult<Paginated<AuditLogEntry>> {
        actor.require(Capability::ViewAuditLog)?;

        let (entries, total) = self.uow.audit_log().list(&params).await?;
        Ok(Paginated::new(entries, params.page, params.limit(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdminRole, Role};
    use crate::errors::AppError;
    use crate::infra::MockAuditRepository;
    use crate::services::test_support::TestUnitOfWork;

    #[tokio::test]
    async fn test_seller_manager_cannot_read_audit_log() {
        let mut audit_log = MockAuditRepository::new();
        audit_log.expect_list().never();

        let service = AuditTrail::new(Arc::new(TestUnitOfWork::new().with_audit_log(audit_log)));
        let actor = Actor::new(1, Role::Admin, Some(AdminRole::SellerManager));

        let result = service.list(actor, PaginationParams::default()).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_page_metadata_reflects_total() {
        let mut audit_log = MockAuditRepository::new();
        audit_log
            .expect_list()
            .returning(|_| Ok((Vec::new(), 45)));

        let service = AuditTrail::new(Arc::new(TestUnitOfWork::new().with_audit_log(audit_log)));
        let actor = Actor::new(1, Role::Admin, Some(AdminRole::SuperAdmin));

        let page = service
            .list(
                actor,
                PaginationParams {
                    page: 2,
                    per_page: 20,
                },
            )
            .await
            .unwrap();

        assert_eq!(page.meta.total, 45);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.page, 2);
    }
}
