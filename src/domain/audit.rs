//! Administrative audit trail.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    #[sea_orm(string_value = "APPROVE_SELLER")]
    ApproveSeller,
    #[sea_orm(string_value = "REJECT_SELLER")]
    RejectSeller,
    #[sea_orm(string_value = "REOPEN_REGISTRATION")]
    ReopenRegistration,
    #[sea_orm(string_value = "SUSPEND_SELLER")]
    SuspendSeller,
    #[sea_orm(string_value = "REINSTATE_SELLER")]
    ReinstateSeller,
}

/// Kind of entity an audit entry points at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AuditTarget {
    #[sea_orm(string_value = "seller_registration")]
    SellerRegistration,
    #[sea_orm(string_value = "user")]
    User,
}

/// Immutable record of an administrative action.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditLogEntry {
    pub id: i32,
    pub actor_id: i32,
    pub action: AuditAction,
    pub target_type: AuditTarget,
    pub target_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An audit entry about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub actor_id: i32,
    pub action: AuditAction,
    pub target_type: AuditTarget,
    pub target_id: i32,
    pub notes: Option<String>,
}

impl NewAuditEntry {
    /// An action taken on a registration request.
    pub fn on_registration(
        actor_id: i32,
        action: AuditAction,
        request_id: i32,
        notes: Option<String>,
    ) -> Self {
        Self {
            actor_id,
            action,
            target_type: AuditTarget::SellerRegistration,
            target_id: request_id,
            notes,
        }
    }

    /// An action taken directly on a user account.
    pub fn on_user(actor_id: i32, action: AuditAction, user_id: i32, notes: Option<String>) -> Self {
        Self {
            actor_id,
            action,
            target_type: AuditTarget::User,
            target_id: user_id,
            notes,
        }
    }
}
