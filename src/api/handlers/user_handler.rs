//! Account handlers for the authenticated caller.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::AppState;
use crate::domain::{Actor, UserResponse};
use crate::errors::AppResult;

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// The caller's account, including role and seller status
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account no longer exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.identity().get_user(actor.user_id).await?;
    Ok(Json(user.into()))
}
