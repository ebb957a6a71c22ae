//! Approval workflow engine.
//!
//! Drives a registration request through review and keeps the applicant's
//! role and seller status in step with it. Every transition:
//!
//! 1. checks the caller's capability before touching storage,
//! 2. runs in one transaction that locks the request row, re-checks its
//!    status, applies a compare-and-set update, rewrites the user's standing
//!    and appends the audit entry,
//! 3. notifies the applicant after commit, without waiting on delivery.

use async_trait::async_trait;
use std::sync::Arc;

use super::{Notifier, RegistrationService};
use crate::config::MAX_REASON_LENGTH;
use crate::domain::{
    Actor, AuditAction, Capability, NewAuditEntry, PendingRegistration, RegistrationRequest,
    RequestStatus, Role, SellerStatus, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Decision, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Input to an approval.
#[derive(Debug, Clone, Default)]
pub struct ApproveDecision {
    pub admin_notes: Option<String>,
    pub documents_verified: Option<bool>,
}

/// Input to a rejection.
#[derive(Debug, Clone, Default)]
pub struct RejectDecision {
    pub rejection_reason: String,
    pub admin_notes: Option<String>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ApprovalService: Send + Sync {
    /// The review queue as seen by `actor`
    async fn pending_queue(&self, actor: Actor) -> AppResult<Vec<PendingRegistration>>;

    /// A single request, for reviewers
    async fn review_detail(&self, actor: Actor, request_id: i32) -> AppResult<RegistrationRequest>;

    /// PENDING -> APPROVED; the applicant becomes an approved seller
    async fn approve(
        &self,
        actor: Actor,
        request_id: i32,
        decision: ApproveDecision,
    ) -> AppResult<RegistrationRequest>;

    /// PENDING -> REJECTED; the applicant stays a buyer
    async fn reject(
        &self,
        actor: Actor,
        request_id: i32,
        decision: RejectDecision,
    ) -> AppResult<RegistrationRequest>;

    /// APPROVED -> PENDING; the seller returns to buyer pending review
    async fn reopen(
        &self,
        actor: Actor,
        request_id: i32,
        admin_notes: Option<String>,
    ) -> AppResult<RegistrationRequest>;

    /// Approved seller -> suspended seller
    async fn suspend(&self, actor: Actor, user_id: i32, reason: String) -> AppResult<User>;

    /// Suspended seller -> approved seller
    async fn reinstate(&self, actor: Actor, user_id: i32, notes: Option<String>) -> AppResult<User>;
}

pub struct ApprovalEngine<U: UnitOfWork> {
    uow: Arc<U>,
    registrations: Arc<dyn RegistrationService>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> ApprovalEngine<U> {
    pub fn new(
        uow: Arc<U>,
        registrations: Arc<dyn RegistrationService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            uow,
            registrations,
            notifier,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: String, field: &str) -> AppResult<String> {
    let value = non_blank(Some(value))
        .ok_or_else(|| AppError::validation(format!("{} is required", field)))?;
    if value.chars().count() as u64 > MAX_REASON_LENGTH {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, MAX_REASON_LENGTH
        )));
    }
    Ok(value)
}

fn ensure_request_status(request: &RegistrationRequest, expected: RequestStatus) -> AppResult<()> {
    if request.status == expected {
        Ok(())
    } else {
        Err(AppError::invalid_state(format!(
            "Registration {} is {}, expected {}",
            request.id, request.status, expected
        )))
    }
}

fn ensure_seller_status(user: &User, expected: SellerStatus) -> AppResult<()> {
    if user.role == Role::Seller && user.seller_status == expected {
        Ok(())
    } else {
        Err(AppError::invalid_state(format!(
            "User {} is {}/{}, expected seller/{}",
            user.id, user.role, user.seller_status, expected
        )))
    }
}

#[async_trait]
impl<U: UnitOfWork> ApprovalService for ApprovalEngine<U> {
    async fn pending_queue(&self, actor: Actor) -> AppResult<Vec<PendingRegistration>> {
        actor.require(Capability::ViewPendingRegistrations)?;
        self.registrations.get_pending(actor.review_scope()).await
    }

    async fn review_detail(&self, actor: Actor, request_id: i32) -> AppResult<RegistrationRequest> {
        actor.require(Capability::ViewPendingRegistrations)?;
        self.registrations.find(request_id).await
    }

    async fn approve(
        &self,
        actor: Actor,
        request_id: i32,
        decision: ApproveDecision,
    ) -> AppResult<RegistrationRequest> {
        actor.require(Capability::ReviewSellerRegistration)?;

        let admin_id = actor.user_id;
        let admin_notes = non_blank(decision.admin_notes);
        let documents_verified = decision.documents_verified;

        let request = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let registrations = ctx.registrations();
                    let current = registrations
                        .find_for_update(request_id)
                        .await?
                        .ok_or_not_found()?;
                    ensure_request_status(&current, RequestStatus::Pending)?;

                    let approved = registrations
                        .mark_approved(
                            request_id,
                            Decision {
                                reviewer_id: admin_id,
                                admin_notes: admin_notes.clone(),
                            },
                            documents_verified,
                        )
                        .await?;

                    ctx.users()
                        .set_role_and_status(approved.user_id, Role::Seller, SellerStatus::Approved)
                        .await?;

                    ctx.audit_log()
                        .record(NewAuditEntry::on_registration(
                            admin_id,
                            AuditAction::ApproveSeller,
                            request_id,
                            admin_notes,
                        ))
                        .await?;

                    Ok(approved)
                })
            })
            .await?;

        tracing::info!(
            request_id,
            user_id = request.user_id,
            admin_id,
            "Seller registration approved"
        );
        self.notifier.notify_approved(request.user_id, request.id);

        Ok(request)
    }

    async fn reject(
        &self,
        actor: Actor,
        request_id: i32,
        decision: RejectDecision,
    ) -> AppResult<RegistrationRequest> {
        actor.require(Capability::ReviewSellerRegistration)?;
        let reason = required(decision.rejection_reason, "rejection_reason")?;

        let admin_id = actor.user_id;
        let admin_notes = non_blank(decision.admin_notes);
        let audit_notes = reason.clone();

        let request = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let registrations = ctx.registrations();
                    let current = registrations
                        .find_for_update(request_id)
                        .await?
                        .ok_or_not_found()?;
                    ensure_request_status(&current, RequestStatus::Pending)?;

                    let rejected = registrations
                        .mark_rejected(
                            request_id,
                            Decision {
                                reviewer_id: admin_id,
                                admin_notes,
                            },
                            reason,
                        )
                        .await?;

                    ctx.users()
                        .set_role_and_status(rejected.user_id, Role::Buyer, SellerStatus::Rejected)
                        .await?;

                    ctx.audit_log()
                        .record(NewAuditEntry::on_registration(
                            admin_id,
                            AuditAction::RejectSeller,
                            request_id,
                            Some(audit_notes),
                        ))
                        .await?;

                    Ok(rejected)
                })
            })
            .await?;

        tracing::info!(
            request_id,
            user_id = request.user_id,
            admin_id,
            "Seller registration rejected"
        );
        let reason = request.rejection_reason.as_deref().unwrap_or_default();
        self.notifier
            .notify_rejected(request.user_id, request.id, reason);

        Ok(request)
    }

    async fn reopen(
        &self,
        actor: Actor,
        request_id: i32,
        admin_notes: Option<String>,
    ) -> AppResult<RegistrationRequest> {
        actor.require(Capability::ReopenRegistration)?;

        let admin_id = actor.user_id;
        let admin_notes = non_blank(admin_notes);

        let request = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let registrations = ctx.registrations();
                    let current = registrations
                        .find_for_update(request_id)
                        .await?
                        .ok_or_not_found()?;
                    ensure_request_status(&current, RequestStatus::Approved)?;

                    let reopened = registrations
                        .reopen(
                            request_id,
                            Decision {
                                reviewer_id: admin_id,
                                admin_notes: admin_notes.clone(),
                            },
                        )
                        .await?;

                    ctx.users()
                        .set_role_and_status(reopened.user_id, Role::Buyer, SellerStatus::Pending)
                        .await?;

                    ctx.audit_log()
                        .record(NewAuditEntry::on_registration(
                            admin_id,
                            AuditAction::ReopenRegistration,
                            request_id,
                            admin_notes,
                        ))
                        .await?;

                    Ok(reopened)
                })
            })
            .await?;

        tracing::warn!(
            request_id,
            user_id = request.user_id,
            admin_id,
            "Approved seller registration re-opened"
        );

        Ok(request)
    }

    async fn suspend(&self, actor: Actor, user_id: i32, reason: String) -> AppResult<User> {
        actor.require(Capability::ManageSellerStanding)?;
        let reason = required(reason, "reason")?;
        let admin_id = actor.user_id;

        let user = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let users = ctx.users();
                    let current = users.find_for_update(user_id).await?.ok_or_not_found()?;
                    ensure_seller_status(&current, SellerStatus::Approved)?;

                    let suspended = users
                        .set_role_and_status(user_id, Role::Seller, SellerStatus::Suspended)
                        .await?;

                    ctx.audit_log()
                        .record(NewAuditEntry::on_user(
                            admin_id,
                            AuditAction::SuspendSeller,
                            user_id,
                            Some(reason),
                        ))
                        .await?;

                    Ok(suspended)
                })
            })
            .await?;

        tracing::info!(user_id, admin_id, "Seller suspended");
        Ok(user)
    }

    async fn reinstate(&self, actor: Actor, user_id: i32, notes: Option<String>) -> AppResult<User> {
        actor.require(Capability::ManageSellerStanding)?;
        let notes = non_blank(notes);
        let admin_id = actor.user_id;

        let user = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let users = ctx.users();
                    let current = users.find_for_update(user_id).await?.ok_or_not_found()?;
                    ensure_seller_status(&current, SellerStatus::Suspended)?;

                    let reinstated = users
                        .set_role_and_status(user_id, Role::Seller, SellerStatus::Approved)
                        .await?;

                    ctx.audit_log()
                        .record(NewAuditEntry::on_user(
                            admin_id,
                            AuditAction::ReinstateSeller,
                            user_id,
                            notes,
                        ))
                        .await?;

                    Ok(reinstated)
                })
            })
            .await?;

        tracing::info!(user_id, admin_id, "Seller reinstated");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AdminRole;
    use crate::services::notifier::MockNotifier;
    use crate::services::registration_service::MockRegistrationService;
    use crate::services::test_support::TestUnitOfWork;

    fn admin(admin_role: AdminRole) -> Actor {
        Actor::new(100, Role::Admin, Some(admin_role))
    }

    fn silent_notifier() -> MockNotifier {
        let mut notifier = MockNotifier::new();
        notifier.expect_notify_approved().never();
        notifier.expect_notify_rejected().never();
        notifier
    }

    fn engine(
        uow: Arc<TestUnitOfWork>,
        registrations: MockRegistrationService,
    ) -> ApprovalEngine<TestUnitOfWork> {
        ApprovalEngine::new(uow, Arc::new(registrations), Arc::new(silent_notifier()))
    }

    #[tokio::test]
    async fn test_price_manager_is_always_forbidden() {
        let uow = Arc::new(TestUnitOfWork::new());
        let engine = engine(uow.clone(), MockRegistrationService::new());
        let actor = admin(AdminRole::PriceManager);

        let approve = engine.approve(actor, 1, ApproveDecision::default()).await;
        assert!(matches!(approve, Err(AppError::Forbidden)));

        // Authorization is decided before the request is even looked at
        let reject = engine
            .reject(
                actor,
                999_999,
                RejectDecision {
                    rejection_reason: String::new(),
                    admin_notes: None,
                },
            )
            .await;
        assert!(matches!(reject, Err(AppError::Forbidden)));

        let queue = engine.pending_queue(actor).await;
        assert!(matches!(queue, Err(AppError::Forbidden)));

        let suspend = engine.suspend(actor, 5, "fraud".into()).await;
        assert!(matches!(suspend, Err(AppError::Forbidden)));

        assert_eq!(uow.transactions_opened(), 0);
    }

    #[tokio::test]
    async fn test_only_super_admin_may_reopen() {
        let uow = Arc::new(TestUnitOfWork::new());
        let engine = engine(uow.clone(), MockRegistrationService::new());

        let result = engine
            .reopen(admin(AdminRole::SellerManager), 1, None)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
        assert_eq!(uow.transactions_opened(), 0);
    }

    #[tokio::test]
    async fn test_blank_rejection_reason_is_a_validation_error() {
        let uow = Arc::new(TestUnitOfWork::new());
        let engine = engine(uow.clone(), MockRegistrationService::new());

        let result = engine
            .reject(
                admin(AdminRole::SellerManager),
                1,
                RejectDecision {
                    rejection_reason: "   ".into(),
                    admin_notes: Some("looked fine".into()),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(uow.transactions_opened(), 0);
    }

    #[tokio::test]
    async fn test_blank_suspension_reason_is_a_validation_error() {
        let uow = Arc::new(TestUnitOfWork::new());
        let engine = engine(uow.clone(), MockRegistrationService::new());

        let result = engine
            .suspend(admin(AdminRole::SuperAdmin), 5, String::new())
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(uow.transactions_opened(), 0);
    }

    #[tokio::test]
    async fn test_pending_queue_uses_reviewer_scope() {
        let mut registrations = MockRegistrationService::new();
        registrations
            .expect_get_pending()
            .withf(|scope| *scope == crate::domain::ReviewScope::All)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let engine = engine(Arc::new(TestUnitOfWork::new()), registrations);

        let queue = engine
            .pending_queue(admin(AdminRole::SellerManager))
            .await
            .unwrap();
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_failed_transaction_does_not_notify() {
        let uow = Arc::new(TestUnitOfWork::new());
        let engine = engine(uow.clone(), MockRegistrationService::new());

        let result = engine
            .approve(admin(AdminRole::SellerManager), 1, ApproveDecision::default())
            .await;

        assert!(result.is_err());
        assert_eq!(uow.transactions_opened(), 1);
    }
}
