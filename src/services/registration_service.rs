//! Registration request ledger use cases: filing and reading applications.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MAX_FARM_NAME_LENGTH;
use crate::domain::{
    FarmDetails, PendingRegistration, RegistrationRequest, ReviewScope, Role, SellerStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// File a seller application for `user_id`.
    ///
    /// Fails with `AlreadyPending` if one is outstanding, and `InvalidRole`
    /// unless the user is a buyer without standing or a rejected applicant.
    async fn submit(&self, user_id: i32, farm: FarmDetails) -> AppResult<RegistrationRequest>;

    /// Pending applications visible within `scope`, oldest first
    async fn get_pending(&self, scope: ReviewScope) -> AppResult<Vec<PendingRegistration>>;

    async fn find(&self, id: i32) -> AppResult<RegistrationRequest>;

    /// A user's own applications, newest first
    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<RegistrationRequest>>;
}

pub struct RegistrationLedger<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RegistrationLedger<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

fn normalize(farm: FarmDetails) -> AppResult<FarmDetails> {
    fn optional(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    let farm_name = farm.farm_name.trim().to_string();
    if farm_name.is_empty() {
        return Err(AppError::validation("farm_name must not be blank"));
    }
    if farm_name.chars().count() as u64 > MAX_FARM_NAME_LENGTH {
        return Err(AppError::validation(format!(
            "farm_name must be at most {} characters",
            MAX_FARM_NAME_LENGTH
        )));
    }

    Ok(FarmDetails {
        farm_name,
        farm_location: optional(farm.farm_location),
        products_grown: optional(farm.products_grown),
        store_name: optional(farm.store_name),
        store_description: optional(farm.store_description),
    })
}

#[async_trait]
impl<U: UnitOfWork> RegistrationService for RegistrationLedger<U> {
    async fn submit(&self, user_id: i32, farm: FarmDetails) -> AppResult<RegistrationRequest> {
        let farm = normalize(farm)?;

        let result = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let user = ctx.users().find_for_update(user_id).await?.ok_or_not_found()?;

                    let registrations = ctx.registrations();
                    if registrations.find_pending_for_user(user_id).await?.is_some() {
                        return Err(AppError::AlreadyPending);
                    }
                    if !user.may_apply_for_seller() {
                        return Err(AppError::invalid_role(format!(
                            "A {} with seller status {} cannot apply to become a seller",
                            user.role, user.seller_status
                        )));
                    }

                    let request = registrations.insert(user_id, farm).await?;
                    ctx.users()
                        .set_role_and_status(user_id, Role::Buyer, SellerStatus::Pending)
                        .await?;
                    Ok(request)
                })
            })
            .await;

        match result {
            Ok(request) => {
                tracing::info!(
                    request_id = request.id,
                    user_id,
                    "Seller registration submitted"
                );
                Ok(request)
            }
            // Lost a race against a concurrent submission for the same user
            Err(e) if e.is_unique_violation() => Err(AppError::AlreadyPending),
            Err(e) => Err(e),
        }
    }

    async fn get_pending(&self, scope: ReviewScope) -> AppResult<Vec<PendingRegistration>> {
        match scope {
            ReviewScope::All => self.uow.registrations().list_pending().await,
            ReviewScope::Nothing => Ok(Vec::new()),
        }
    }

    async fn find(&self, id: i32) -> AppResult<RegistrationRequest> {
        self.uow.registrations().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<RegistrationRequest>> {
        self.uow.registrations().list_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockRegistrationRepository;
    use crate::services::test_support::TestUnitOfWork;

    #[tokio::test]
    async fn test_blank_farm_name_is_rejected_without_a_transaction() {
        let uow = Arc::new(TestUnitOfWork::new());
        let ledger = RegistrationLedger::new(uow.clone());

        let result = ledger
            .submit(
                1,
                FarmDetails {
                    farm_name: "   ".into(),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(uow.transactions_opened(), 0);
    }

    #[tokio::test]
    async fn test_scoped_out_admin_sees_nothing() {
        let mut registrations = MockRegistrationRepository::new();
        registrations.expect_list_pending().never();

        let ledger =
            RegistrationLedger::new(Arc::new(TestUnitOfWork::new().with_registrations(registrations)));

        let pending = ledger.get_pending(ReviewScope::Nothing).await.unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_find_missing_request() {
        let mut registrations = MockRegistrationRepository::new();
        registrations.expect_find_by_id().returning(|_| Ok(None));

        let ledger =
            RegistrationLedger::new(Arc::new(TestUnitOfWork::new().with_registrations(registrations)));

        assert!(matches!(ledger.find(404).await, Err(AppError::NotFound)));
    }

    #[test]
    fn test_normalize_trims_and_drops_empty_optionals() {
        let farm = normalize(FarmDetails {
            farm_name: "  Green Acres ".into(),
            farm_location: Some("  ".into()),
            products_grown: Some(" kale ".into()),
            store_name: None,
            store_description: Some(String::new()),
        })
        .unwrap();

        assert_eq!(farm.farm_name, "Green Acres");
        assert_eq!(farm.farm_location, None);
        assert_eq!(farm.products_grown.as_deref(), Some("kale"));
        assert_eq!(farm.store_description, None);
    }
}
