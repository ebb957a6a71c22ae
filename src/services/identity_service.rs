//! Identity & role store use cases.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{AdminRole, NewUser, Password, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Operator-provisioned administrator account.
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub password: String,
    pub admin_role: AdminRole,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn get_user(&self, id: i32) -> AppResult<User>;

    async fn create_admin(&self, admin: NewAdmin) -> AppResult<User>;
}

pub struct IdentityManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> IdentityManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> IdentityService for IdentityManager<U> {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_admin(&self, admin: NewAdmin) -> AppResult<User> {
        let password_hash = Password::new(&admin.password)?.into_string();
        let new_user = NewUser::admin(
            admin.email,
            admin.phone,
            admin.full_name,
            password_hash,
            admin.admin_role,
        );

        let user = crate::with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            if users.contact_taken(&new_user.email, &new_user.phone).await? {
                return Err(AppError::conflict("User"));
            }
            users.create(new_user).await
        })?;

        tracing::info!(
            user_id = user.id,
            admin_role = ?user.admin_role,
            "Administrator account created"
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUserRepository;
    use crate::services::test_support::TestUnitOfWork;

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = IdentityManager::new(Arc::new(TestUnitOfWork::new().with_users(users)));

        assert!(matches!(service.get_user(99).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_create_admin_validates_password_first() {
        let uow = Arc::new(TestUnitOfWork::new());
        let service = IdentityManager::new(uow.clone());

        let result = service
            .create_admin(NewAdmin {
                email: "ops@example.com".into(),
                phone: "+15550001".into(),
                full_name: "Ops".into(),
                password: "tiny".into(),
                admin_role: AdminRole::SuperAdmin,
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(uow.transactions_opened(), 0);
    }
}
