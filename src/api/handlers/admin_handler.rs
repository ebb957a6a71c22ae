//! Administrative review handlers.
//!
//! Every route here runs behind `auth_middleware`; capability checks happen
//! in the services so the HTTP layer never decides who may do what.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::{PathParam, ValidatedJson, ValidatedJsonOrDefault};
use crate::api::AppState;
use crate::domain::{Actor, AuditLogEntry, PendingRegistration, RegistrationResponse, UserResponse};
use crate::errors::AppResult;
use crate::services::{ApproveDecision, RejectDecision};
use crate::types::{AuditLogPage, Paginated, PaginationParams};

/// Review queue response
#[derive(Debug, Serialize, ToSchema)]
pub struct PendingListResponse {
    #[schema(example = 1)]
    pub count: usize,
    pub results: Vec<PendingRegistration>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ApproveRequest {
    #[validate(length(max = 2000))]
    pub admin_notes: Option<String>,
    pub documents_verified: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectRequest {
    /// Required; shown to the applicant
    #[serde(default)]
    #[validate(length(max = 2000))]
    #[schema(example = "Farm address could not be verified")]
    pub rejection_reason: String,
    #[validate(length(max = 2000))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ReopenRequest {
    #[validate(length(max = 2000))]
    pub admin_notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SuspendRequest {
    #[serde(default)]
    #[validate(length(max = 2000))]
    #[schema(example = "Repeated quality complaints")]
    pub reason: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct ReinstateRequest {
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// Routes under `/admin` (authenticated)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/seller-registrations/pending", get(list_pending))
        .route("/seller-registrations/:id", get(get_registration))
        .route("/seller-registrations/:id/approve", post(approve))
        .route("/seller-registrations/:id/reject", post(reject))
        .route("/seller-registrations/:id/reopen", post(reopen))
        .route("/sellers/:user_id/suspend", post(suspend))
        .route("/sellers/:user_id/reinstate", post(reinstate))
        .route("/audit-logs", get(list_audit_logs))
}

/// Pending seller applications, oldest first
#[utoipa::path(
    get,
    path = "/admin/seller-registrations/pending",
    tag = "Admin",
    responses(
        (status = 200, description = "Review queue", body = PendingListResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller may not review sellers")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_pending(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<PendingListResponse>> {
    let results = state.services.approvals().pending_queue(actor).await?;

    Ok(Json(PendingListResponse {
        count: results.len(),
        results,
    }))
}

/// A single application
#[utoipa::path(
    get,
    path = "/admin/seller-registrations/{id}",
    tag = "Admin",
    params(("id" = i32, Path, description = "Registration request ID")),
    responses(
        (status = 200, description = "Application", body = RegistrationResponse),
        (status = 403, description = "Caller may not review sellers"),
        (status = 404, description = "No such application")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_registration(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<RegistrationResponse>> {
    let request = state.services.approvals().review_detail(actor, id).await?;
    Ok(Json(request.into()))
}

/// Approve a pending application
#[utoipa::path(
    post,
    path = "/admin/seller-registrations/{id}/approve",
    tag = "Admin",
    params(("id" = i32, Path, description = "Registration request ID")),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Approved", body = RegistrationResponse),
        (status = 400, description = "Application is not pending"),
        (status = 403, description = "Caller may not review sellers"),
        (status = 404, description = "No such application")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(id): PathParam<i32>,
    ValidatedJsonOrDefault(payload): ValidatedJsonOrDefault<ApproveRequest>,
) -> AppResult<Json<RegistrationResponse>> {
    let request = state
        .services
        .approvals()
        .approve(
            actor,
            id,
            ApproveDecision {
                admin_notes: payload.admin_notes,
                documents_verified: payload.documents_verified,
            },
        )
        .await?;

    Ok(Json(request.into()))
}

/// Reject a pending application
#[utoipa::path(
    post,
    path = "/admin/seller-registrations/{id}/reject",
    tag = "Admin",
    params(("id" = i32, Path, description = "Registration request ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Rejected", body = RegistrationResponse),
        (status = 400, description = "Missing reason or application is not pending"),
        (status = 403, description = "Caller may not review sellers"),
        (status = 404, description = "No such application")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(id): PathParam<i32>,
    ValidatedJson(payload): ValidatedJson<RejectRequest>,
) -> AppResult<Json<RegistrationResponse>> {
    let request = state
        .services
        .approvals()
        .reject(
            actor,
            id,
            RejectDecision {
                rejection_reason: payload.rejection_reason,
                admin_notes: payload.admin_notes,
            },
        )
        .await?;

    Ok(Json(request.into()))
}

/// Send an approved application back to review
#[utoipa::path(
    post,
    path = "/admin/seller-registrations/{id}/reopen",
    tag = "Admin",
    params(("id" = i32, Path, description = "Registration request ID")),
    request_body = ReopenRequest,
    responses(
        (status = 200, description = "Re-opened", body = RegistrationResponse),
        (status = 400, description = "Application is not approved"),
        (status = 403, description = "Caller is not a super admin"),
        (status = 404, description = "No such application")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reopen(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(id): PathParam<i32>,
    ValidatedJsonOrDefault(payload): ValidatedJsonOrDefault<ReopenRequest>,
) -> AppResult<Json<RegistrationResponse>> {
    let request = state
        .services
        .approvals()
        .reopen(actor, id, payload.admin_notes)
        .await?;

    Ok(Json(request.into()))
}

/// Suspend an approved seller
#[utoipa::path(
    post,
    path = "/admin/sellers/{user_id}/suspend",
    tag = "Admin",
    params(("user_id" = i32, Path, description = "Seller's user ID")),
    request_body = SuspendRequest,
    responses(
        (status = 200, description = "Suspended", body = UserResponse),
        (status = 400, description = "Missing reason or user is not an approved seller"),
        (status = 403, description = "Caller may not manage sellers"),
        (status = 404, description = "No such user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn suspend(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(user_id): PathParam<i32>,
    ValidatedJson(payload): ValidatedJson<SuspendRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .approvals()
        .suspend(actor, user_id, payload.reason)
        .await?;

    Ok(Json(user.into()))
}

/// Lift a seller's suspension
#[utoipa::path(
    post,
    path = "/admin/sellers/{user_id}/reinstate",
    tag = "Admin",
    params(("user_id" = i32, Path, description = "Seller's user ID")),
    request_body = ReinstateRequest,
    responses(
        (status = 200, description = "Reinstated", body = UserResponse),
        (status = 400, description = "User is not a suspended seller"),
        (status = 403, description = "Caller may not manage sellers"),
        (status = 404, description = "No such user")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reinstate(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    PathParam(user_id): PathParam<i32>,
    ValidatedJsonOrDefault(payload): ValidatedJsonOrDefault<ReinstateRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .approvals()
        .reinstate(actor, user_id, payload.notes)
        .await?;

    Ok(Json(user.into()))
}

/// Administrative audit trail, newest first
#[utoipa::path(
    get,
    path = "/admin/audit-logs",
    tag = "Admin",
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of audit entries", body = AuditLogPage),
        (status = 403, description = "Caller is not a super admin")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<AuditLogPage>> {
    let page: Paginated<AuditLogEntry> = state.services.audit().list(actor, params).await?;
    Ok(Json(page))
}
