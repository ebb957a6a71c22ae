//! HTTP tests for the seller onboarding API.
//!
//! The router runs over the real service container and an in-memory
//! database; requests go through `tower::ServiceExt::oneshot`.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use farmgate::api::{create_router, AppState};
use farmgate::config::{Config, DEV_JWT_SECRET};
use farmgate::domain::AdminRole;
use farmgate::infra::{Database, Persistence};
use farmgate::services::{IdentityManager, IdentityService, LogNotifier, NewAdmin};

struct TestApp {
    router: Router,
    db: Database,
}

impl TestApp {
    async fn new() -> Self {
        let db = Database::from_connection(common::connect().await);
        let config = Config::builder(DEV_JWT_SECRET).build().unwrap();
        let state = AppState::from_config(Arc::new(db.clone()), config, Arc::new(LogNotifier));

        Self {
            router: create_router(state, Duration::from_secs(5)),
            db,
        }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    async fn buyer_token(&self, name: &str) -> String {
        let email = format!("{}@farm.test", name);
        let (status, _) = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "phone": format!("+1555-{}", name),
                    "password": "correct-horse-battery",
                    "full_name": name,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.login(&email, "correct-horse-battery").await
    }

    async fn admin_token(&self, name: &str, admin_role: AdminRole) -> String {
        let identity = IdentityManager::new(Arc::new(Persistence::new(self.db.get_connection())));
        let email = format!("{}@admin.test", name);
        identity
            .create_admin(NewAdmin {
                email: email.clone(),
                phone: format!("+1666-{}", name),
                full_name: name.to_string(),
                password: "admin-password-123".to_string(),
                admin_role,
            })
            .await
            .unwrap();
        self.login(&email, "admin-password-123").await
    }

    async fn submit(&self, token: &str, farm_name: &str) -> i64 {
        let (status, body) = self
            .send(
                Method::POST,
                "/seller-registrations",
                Some(token),
                Some(json!({ "farm_name": farm_name, "products_grown": "apples" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "submit failed: {}", body);
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = TestApp::new().await;

    let (status, body) = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::GET, "/admin/seller-registrations/pending", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

    let (status, _) = app
        .send(Method::GET, "/seller-registrations/mine", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_signup_conflicts() {
    let app = TestApp::new().await;
    app.buyer_token("uma").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({
                "email": "uma@farm.test",
                "phone": "+1555-other",
                "password": "correct-horse-battery",
                "full_name": "Uma Again",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::new().await;
    app.buyer_token("val").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "email": "val@farm.test", "password": "not-the-password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_pending_queue_shape_and_approval() {
    let app = TestApp::new().await;
    let buyer = app.buyer_token("wes").await;
    let reviewer = app.admin_token("mona", AdminRole::SellerManager).await;
    let id = app.submit(&buyer, "Wes Walnuts").await;

    let (status, body) = app
        .send(Method::GET, "/admin/seller-registrations/pending", Some(&reviewer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["id"], id);
    assert_eq!(body["results"][0]["farm_name"], "Wes Walnuts");
    assert_eq!(body["results"][0]["seller_email"], "wes@farm.test");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/admin/seller-registrations/{}/approve", id),
            Some(&reviewer),
            Some(json!({ "documents_verified": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/admin/seller-registrations/{}/approve", id),
            Some(&reviewer),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_second_submission_is_already_pending() {
    let app = TestApp::new().await;
    let buyer = app.buyer_token("xan").await;
    app.submit(&buyer, "Xan's").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/seller-registrations",
            Some(&buyer),
            Some(json!({ "farm_name": "Xan's Again" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "ALREADY_PENDING");

    let (status, body) = app
        .send(Method::GET, "/seller-registrations/mine", Some(&buyer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_reject_without_reason_is_bad_request() {
    let app = TestApp::new().await;
    let buyer = app.buyer_token("yul").await;
    let reviewer = app.admin_token("mona", AdminRole::SellerManager).await;
    let id = app.submit(&buyer, "Yul Yams").await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/admin/seller-registrations/{}/reject", id),
            Some(&reviewer),
            Some(json!({ "admin_notes": "no reason given" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");
}

#[tokio::test]
async fn test_price_manager_is_forbidden() {
    let app = TestApp::new().await;
    let buyer = app.buyer_token("zed").await;
    let outsider = app.admin_token("pm", AdminRole::PriceManager).await;
    let id = app.submit(&buyer, "Zed Zucchini").await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/admin/seller-registrations/{}/approve", id),
            Some(&outsider),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = app
        .send(Method::GET, "/admin/seller-registrations/pending", Some(&outsider), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // Buyers are not administrators either
    let (status, _) = app
        .send(Method::GET, "/admin/audit-logs", Some(&buyer), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_audit_log_lists_decisions_for_super_admin() {
    let app = TestApp::new().await;
    let buyer = app.buyer_token("abe").await;
    let root = app.admin_token("root", AdminRole::SuperAdmin).await;
    let id = app.submit(&buyer, "Abe's Apiary").await;

    app.send(
        Method::POST,
        &format!("/admin/seller-registrations/{}/reject", id),
        Some(&root),
        Some(json!({ "rejection_reason": "Hive inspection overdue" })),
    )
    .await;

    let (status, body) = app
        .send(Method::GET, "/admin/audit-logs?page=1&per_page=10", Some(&root), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["action"], "REJECT_SELLER");
    assert_eq!(body["data"][0]["target_id"], id);
    assert_eq!(body["data"][0]["notes"], "Hive inspection overdue");
}

#[tokio::test]
async fn test_me_reports_own_seller_standing() {
    let app = TestApp::new().await;
    let buyer = app.buyer_token("cal").await;

    let (status, body) = app.send(Method::GET, "/users/me", Some(&buyer), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "cal@farm.test");
    assert_eq!(body["role"], "buyer");
    assert_eq!(body["seller_status"], "none");

    app.submit(&buyer, "Cal's Cabbages").await;
    let (_, body) = app.send(Method::GET, "/users/me", Some(&buyer), None).await;
    assert_eq!(body["seller_status"], "pending");

    let (status, _) = app.send(Method::GET, "/users/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_non_numeric_id_is_a_validation_error() {
    let app = TestApp::new().await;
    let reviewer = app.admin_token("mona", AdminRole::SellerManager).await;

    let (status, body) = app
        .send(Method::GET, "/admin/seller-registrations/abc", Some(&reviewer), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");

    let (status, body) = app
        .send(Method::POST, "/admin/sellers/x1/suspend", Some(&reviewer), Some(json!({ "reason": "spam" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION");
}

#[tokio::test]
async fn test_bare_post_approves_with_defaults() {
    let app = TestApp::new().await;
    let buyer = app.buyer_token("dee").await;
    let reviewer = app.admin_token("mona", AdminRole::SuperAdmin).await;
    let id = app.submit(&buyer, "Dee's Dairy").await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/admin/seller-registrations/{}/approve", id),
            Some(&reviewer),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");
    assert_eq!(body["documents_verified"], false);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/admin/seller-registrations/{}/reopen", id),
            Some(&reviewer),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
}
