//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// Validated JSON extractor that automatically validates requests.
///
/// # Example
///
/// ```rust,ignore
/// use serde::Deserialize;
/// use validator::Validate;
/// use farmgate::api::extractors::ValidatedJson;
///
/// #[derive(Deserialize, Validate)]
/// struct SuspendRequest {
///     #[validate(length(min = 1, max = 2000))]
///     reason: String,
/// }
///
/// async fn suspend(ValidatedJson(payload): ValidatedJson<SuspendRequest>) {
///     // payload is already validated
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// Like [`ValidatedJson`], but an empty body yields `T::default()`.
///
/// Used by actions whose every field is optional, so a bare `POST` works.
pub struct ValidatedJsonOrDefault<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJsonOrDefault<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Default,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            T::default()
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                AppError::validation(format!("Failed to parse the request body as JSON: {}", e))
            })?
        };

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJsonOrDefault(value))
    }
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct FarmForm {
        #[validate(length(min = 1, message = "farm_name is required"))]
        farm_name: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_rule_violation_uses_field_message() {
        let result = ValidatedJson::<FarmForm>::from_request(json_request(r#"{"farm_name":""}"#), &()).await;

        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "farm_name is required"),
            other => panic!("expected validation error, got {:?}", other.map(|v| v.0)),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_validation_error() {
        let result = ValidatedJson::<FarmForm>::from_request(json_request("{not json"), &()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_valid_body_passes_through() {
        let ValidatedJson(form) =
            ValidatedJson::<FarmForm>::from_request(json_request(r#"{"farm_name":"Green Acres"}"#), &())
                .await
                .unwrap();
        assert_eq!(form.farm_name, "Green Acres");
    }

    #[derive(Debug, Default, Deserialize, Validate)]
    struct NotesForm {
        #[validate(length(max = 5, message = "admin_notes is too long"))]
        admin_notes: Option<String>,
    }

    fn raw_request(body: &'static str) -> Request {
        Request::builder().body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_empty_body_falls_back_to_default() {
        let ValidatedJsonOrDefault(form) =
            ValidatedJsonOrDefault::<NotesForm>::from_request(raw_request(""), &())
                .await
                .unwrap();
        assert!(form.admin_notes.is_none());
    }

    #[tokio::test]
    async fn test_present_body_is_still_parsed_and_validated() {
        let ValidatedJsonOrDefault(form) =
            ValidatedJsonOrDefault::<NotesForm>::from_request(json_request(r#"{"admin_notes":"ok"}"#), &())
                .await
                .unwrap();
        assert_eq!(form.admin_notes.as_deref(), Some("ok"));

        let too_long =
            ValidatedJsonOrDefault::<NotesForm>::from_request(json_request(r#"{"admin_notes":"far too long"}"#), &())
                .await;
        assert!(matches!(too_long, Err(AppError::Validation(msg)) if msg == "admin_notes is too long"));

        let malformed = ValidatedJsonOrDefault::<NotesForm>::from_request(raw_request("{oops"), &()).await;
        assert!(matches!(malformed, Err(AppError::Validation(_))));
    }
}
