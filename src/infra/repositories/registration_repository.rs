//! Registration request ledger.
//!
//! Status changes are compare-and-set: every transition names the status it
//! expects to leave, and an update that matches no row means another caller
//! got there first.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::entities::seller_registration::{self, ActiveModel, Entity as RegistrationEntity};
use super::entities::user::Entity as UserEntity;
use crate::domain::{FarmDetails, PendingRegistration, RegistrationRequest, RequestStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read access to the ledger outside of a transaction.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Find a request by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<RegistrationRequest>>;

    /// All pending requests with applicant details, oldest first
    async fn list_pending(&self) -> AppResult<Vec<PendingRegistration>>;

    /// Every request a user has filed, newest first
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<RegistrationRequest>>;
}

/// Connection-backed implementation of RegistrationRepository
pub struct RegistrationStore {
    db: DatabaseConnection,
}

impl RegistrationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RegistrationRepository for RegistrationStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<RegistrationRequest>> {
        find_by_id(&self.db, id).await
    }

    async fn list_pending(&self) -> AppResult<Vec<PendingRegistration>> {
        let rows = RegistrationEntity::find()
            .filter(seller_registration::Column::Status.eq(RequestStatus::Pending))
            .find_also_related(UserEntity)
            .order_by_asc(seller_registration::Column::Id)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|(request, applicant)| {
                let applicant = applicant.ok_or_else(|| {
                    AppError::internal(format!("registration {} has no applicant", request.id))
                })?;
                Ok(PendingRegistration {
                    id: request.id,
                    farm_name: request.farm_name,
                    seller_email: applicant.email,
                    seller_full_name: applicant.full_name,
                    store_name: request.store_name,
                    products_grown: request.products_grown,
                    submitted_at: request.created_at,
                })
            })
            .collect()
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<RegistrationRequest>> {
        let models = RegistrationEntity::find()
            .filter(seller_registration::Column::UserId.eq(user_id))
            .order_by_desc(seller_registration::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(RegistrationRequest::from).collect())
    }
}

async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Option<RegistrationRequest>> {
    let result = RegistrationEntity::find_by_id(id).one(conn).await?;
    Ok(result.map(RegistrationRequest::from))
}

/// Fields written when a request leaves `Pending` or is re-opened.
#[derive(Debug, Clone)]
pub struct Decision {
    pub reviewer_id: i32,
    pub admin_notes: Option<String>,
}

/// Transaction-scoped ledger repository.
pub struct TxRegistrationRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxRegistrationRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Read a request and hold its row lock until the transaction ends.
    pub async fn find_for_update(&self, id: i32) -> AppResult<Option<RegistrationRequest>> {
        let result = RegistrationEntity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?;
        Ok(result.map(RegistrationRequest::from))
    }

    /// The user's outstanding request, if any.
    pub async fn find_pending_for_user(&self, user_id: i32) -> AppResult<Option<RegistrationRequest>> {
        let result = RegistrationEntity::find()
            .filter(seller_registration::Column::UserId.eq(user_id))
            .filter(seller_registration::Column::Status.eq(RequestStatus::Pending))
            .one(self.txn)
            .await?;
        Ok(result.map(RegistrationRequest::from))
    }

    /// File a new pending request.
    pub async fn insert(&self, user_id: i32, farm: FarmDetails) -> AppResult<RegistrationRequest> {
        let now = Utc::now();
        let active_model = ActiveModel {
            user_id: Set(user_id),
            farm_name: Set(farm.farm_name),
            farm_location: Set(farm.farm_location),
            products_grown: Set(farm.products_grown),
            store_name: Set(farm.store_name),
            store_description: Set(farm.store_description),
            status: Set(RequestStatus::Pending),
            rejection_reason: Set(None),
            admin_notes: Set(None),
            documents_verified: Set(false),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            approved_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(self.txn).await?;
        Ok(RegistrationRequest::from(model))
    }

    /// PENDING -> APPROVED.
    pub async fn mark_approved(
        &self,
        id: i32,
        decision: Decision,
        documents_verified: Option<bool>,
    ) -> AppResult<RegistrationRequest> {
        let now = Utc::now();
        let mut update = RegistrationEntity::update_many()
            .col_expr(
                seller_registration::Column::Status,
                Expr::value(RequestStatus::Approved),
            )
            .col_expr(seller_registration::Column::ApprovedAt, Expr::value(now))
            .col_expr(seller_registration::Column::ReviewedAt, Expr::value(now))
            .col_expr(
                seller_registration::Column::ReviewedBy,
                Expr::value(decision.reviewer_id),
            )
            .col_expr(
                seller_registration::Column::AdminNotes,
                Expr::value(decision.admin_notes),
            )
            .col_expr(seller_registration::Column::UpdatedAt, Expr::value(now));

        if let Some(verified) = documents_verified {
            update = update.col_expr(
                seller_registration::Column::DocumentsVerified,
                Expr::value(verified),
            );
        }

        let result = update
            .filter(seller_registration::Column::Id.eq(id))
            .filter(seller_registration::Column::Status.eq(RequestStatus::Pending))
            .exec(self.txn)
            .await?;

        self.reload_after_transition(id, result.rows_affected, RequestStatus::Pending)
            .await
    }

    /// PENDING -> REJECTED.
    pub async fn mark_rejected(
        &self,
        id: i32,
        decision: Decision,
        reason: String,
    ) -> AppResult<RegistrationRequest> {
        let now = Utc::now();
        let result = RegistrationEntity::update_many()
            .col_expr(
                seller_registration::Column::Status,
                Expr::value(RequestStatus::Rejected),
            )
            .col_expr(
                seller_registration::Column::RejectionReason,
                Expr::value(Some(reason)),
            )
            .col_expr(seller_registration::Column::ReviewedAt, Expr::value(now))
            .col_expr(
                seller_registration::Column::ReviewedBy,
                Expr::value(decision.reviewer_id),
            )
            .col_expr(
                seller_registration::Column::AdminNotes,
                Expr::value(decision.admin_notes),
            )
            .col_expr(seller_registration::Column::UpdatedAt, Expr::value(now))
            .filter(seller_registration::Column::Id.eq(id))
            .filter(seller_registration::Column::Status.eq(RequestStatus::Pending))
            .exec(self.txn)
            .await?;

        self.reload_after_transition(id, result.rows_affected, RequestStatus::Pending)
            .await
    }

    /// APPROVED -> PENDING, clearing the previous decision.
    pub async fn reopen(&self, id: i32, decision: Decision) -> AppResult<RegistrationRequest> {
        let now = Utc::now();
        let result = RegistrationEntity::update_many()
            .col_expr(
                seller_registration::Column::Status,
                Expr::value(RequestStatus::Pending),
            )
            .col_expr(
                seller_registration::Column::ApprovedAt,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .col_expr(
                seller_registration::Column::ReviewedAt,
                Expr::value(Option::<chrono::DateTime<Utc>>::None),
            )
            .col_expr(
                seller_registration::Column::ReviewedBy,
                Expr::value(Option::<i32>::None),
            )
            .col_expr(
                seller_registration::Column::AdminNotes,
                Expr::value(decision.admin_notes),
            )
            .col_expr(seller_registration::Column::UpdatedAt, Expr::value(now))
            .filter(seller_registration::Column::Id.eq(id))
            .filter(seller_registration::Column::Status.eq(RequestStatus::Approved))
            .exec(self.txn)
            .await?;

        self.reload_after_transition(id, result.rows_affected, RequestStatus::Approved)
            .await
    }

    async fn reload_after_transition(
        &self,
        id: i32,
        rows_affected: u64,
        expected: RequestStatus,
    ) -> AppResult<RegistrationRequest> {
        if rows_affected != 1 {
            return Err(AppError::invalid_state(format!(
                "Registration {} is no longer {}",
                id, expected
            )));
        }

        find_by_id(self.txn, id).await?.ok_or(AppError::NotFound)
    }
}
