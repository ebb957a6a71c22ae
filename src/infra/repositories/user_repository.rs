//! Identity & role store: user rows, primary role and seller standing.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, Set,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, Role, SellerStatus, User};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Read access to users outside of a transaction.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

/// Connection-backed implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        find_by_id(&self.db, id).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        find_by_email(&self.db, email).await
    }
}

async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i32) -> AppResult<Option<User>> {
    let result = UserEntity::find_by_id(id).one(conn).await?;
    Ok(result.map(User::from))
}

async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> AppResult<Option<User>> {
    let result = UserEntity::find()
        .filter(user::Column::Email.eq(email))
        .one(conn)
        .await?;
    Ok(result.map(User::from))
}

/// Transaction-scoped user repository.
///
/// Role and seller status are only ever written together, through
/// [`TxUserRepository::set_role_and_status`].
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    pub(crate) fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Read a user and hold its row lock until the transaction ends.
    pub async fn find_for_update(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .lock_exclusive()
            .one(self.txn)
            .await?;
        Ok(result.map(User::from))
    }

    /// Whether an account already uses this email or phone number.
    pub async fn contact_taken(&self, email: &str, phone: &str) -> AppResult<bool> {
        let existing = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Phone.eq(phone)),
            )
            .one(self.txn)
            .await?;
        Ok(existing.is_some())
    }

    /// Insert a user. Admins start without seller standing, as do buyers.
    pub async fn create(&self, new_user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let active_model = ActiveModel {
            email: Set(new_user.email),
            phone: Set(new_user.phone),
            full_name: Set(new_user.full_name),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role),
            seller_status: Set(SellerStatus::None),
            admin_role: Set(new_user.admin_role),
            seller_approval_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(self.txn).await?;
        Ok(User::from(model))
    }

    /// Atomically replace a user's role and seller status.
    ///
    /// Refuses combinations that must never be observed (e.g. a buyer with
    /// an approved seller status). The approval date is stamped on promotion
    /// to an approved seller, kept across suspension and reinstatement, and
    /// cleared when the user leaves the seller role.
    pub async fn set_role_and_status(
        &self,
        user_id: i32,
        role: Role,
        seller_status: SellerStatus,
    ) -> AppResult<User> {
        if !role.permits(seller_status) {
            return Err(AppError::internal(format!(
                "refusing inconsistent standing {}/{} for user {}",
                role, seller_status, user_id
            )));
        }

        let current = UserEntity::find_by_id(user_id)
            .lock_exclusive()
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        let approval_date = match (role, seller_status) {
            (Role::Seller, SellerStatus::Approved)
                if current.role == Role::Seller && current.seller_approval_date.is_some() =>
            {
                current.seller_approval_date
            }
            (Role::Seller, SellerStatus::Approved) => Some(now),
            (Role::Seller, _) => current.seller_approval_date,
            _ => None,
        };

        let mut active: ActiveModel = current.into();
        active.role = Set(role);
        active.seller_status = Set(seller_status);
        active.seller_approval_date = Set(approval_date);
        active.updated_at = Set(now);

        let model = active.update(self.txn).await?;
        Ok(User::from(model))
    }
}
