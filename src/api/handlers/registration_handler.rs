//! Seller registration handlers for applicants.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Actor, FarmDetails, RegistrationResponse};
use crate::errors::AppResult;

/// Seller application body
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitRegistrationRequest {
    #[validate(length(min = 1, max = 255, message = "farm_name is required"))]
    #[schema(example = "Green Acres")]
    pub farm_name: String,
    #[validate(length(max = 255))]
    #[schema(example = "Yolo County, CA")]
    pub farm_location: Option<String>,
    #[schema(example = "tomatoes, peppers")]
    pub products_grown: Option<String>,
    #[validate(length(max = 255))]
    #[schema(example = "Green Acres Market")]
    pub store_name: Option<String>,
    pub store_description: Option<String>,
}

impl From<SubmitRegistrationRequest> for FarmDetails {
    fn from(req: SubmitRegistrationRequest) -> Self {
        FarmDetails {
            farm_name: req.farm_name,
            farm_location: req.farm_location,
            products_grown: req.products_grown,
            store_name: req.store_name,
            store_description: req.store_description,
        }
    }
}

/// Routes under `/seller-registrations` (authenticated)
pub fn registration_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .route("/mine", get(list_mine))
}

/// Apply to become a seller
#[utoipa::path(
    post,
    path = "/seller-registrations",
    tag = "Seller Registrations",
    request_body = SubmitRegistrationRequest,
    responses(
        (status = 201, description = "Application filed", body = RegistrationResponse),
        (status = 400, description = "ALREADY_PENDING, INVALID_ROLE or VALIDATION"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(payload): ValidatedJson<SubmitRegistrationRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    let request = state
        .services
        .registrations()
        .submit(actor.user_id, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(RegistrationResponse::from(request))))
}

/// The caller's own applications, newest first
#[utoipa::path(
    get,
    path = "/seller-registrations/mine",
    tag = "Seller Registrations",
    responses(
        (status = 200, description = "Application history", body = [RegistrationResponse]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_mine(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<Vec<RegistrationResponse>>> {
    let requests = state
        .services
        .registrations()
        .list_for_user(actor.user_id)
        .await?;

    Ok(Json(
        requests.into_iter().map(RegistrationResponse::from).collect(),
    ))
}
