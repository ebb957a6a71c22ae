//! Audit log entity.
//!
//! Entries reference users by id only; there is deliberately no foreign key,
//! so the trail outlives the accounts it mentions.

use sea_orm::entity::prelude::*;

use crate::domain::{AuditAction, AuditLogEntry, AuditTarget};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub actor_id: i32,
    pub action: AuditAction,
    pub target_type: AuditTarget,
    pub target_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for AuditLogEntry {
    fn from(model: Model) -> Self {
        AuditLogEntry {
            id: model.id,
            actor_id: model.actor_id,
            action: model.action,
            target_type: model.target_type,
            target_id: model.target_id,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}
