//! Append-only audit trail.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryOrder, Set,
};

use super::entities::audit_log::{self, ActiveModel, Entity as AuditLogEntity};
use crate::domain::{AuditLogEntry, NewAuditEntry};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// One page of entries, newest first, with the total count
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<AuditLogEntry>, u64)>;
}

pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuditRepository for AuditStore {
    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<AuditLogEntry>, u64)> {
        let paginator = AuditLogEntity::find()
            .order_by_desc(audit_log::Column::Id)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page.saturating_sub(1)).await?;

        Ok((models.into_iter().map(AuditLogEntry::from).collect(), total))
    }
}

/// Writes audit entries inside the transaction of the action they describe.
pub struct TxAuditRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxAuditRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub async fn record(&self, entry: NewAuditEntry) -> AppResult<AuditLogEntry> {
        let active_model = ActiveModel {
            actor_id: Set(entry.actor_id),
            action: Set(entry.action),
            target_type: Set(entry.target_type),
            target_id: Set(entry.target_id),
            notes: Set(entry.notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = active_model.insert(self.txn).await?;
        Ok(AuditLogEntry::from(model))
    }
}
