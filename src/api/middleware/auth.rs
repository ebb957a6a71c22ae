//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::AppError;

/// Verify the bearer token and inject the caller's [`Actor`] into the
/// request extensions. Handlers extract it with `Extension<Actor>`.
///
/// [`Actor`]: crate::domain::Actor
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let actor = state.services.auth().verify_token(token)?.actor();
    tracing::debug!(user_id = actor.user_id, role = %actor.role, "Request authenticated");

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}
