//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{admin_handler, auth_handler, registration_handler, user_handler};
use crate::domain::{
    AdminRole, AuditAction, AuditLogEntry, AuditTarget, FarmDetails, PendingRegistration,
    RegistrationResponse, RequestStatus, Role, SellerStatus, UserResponse,
};
use crate::services::TokenResponse;
use crate::types::{AuditLogPage, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Farmgate",
        version = "0.1.0",
        description = "Seller onboarding and approval backend for an agricultural marketplace",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        user_handler::me,
        registration_handler::submit,
        registration_handler::list_mine,
        admin_handler::list_pending,
        admin_handler::get_registration,
        admin_handler::approve,
        admin_handler::reject,
        admin_handler::reopen,
        admin_handler::suspend,
        admin_handler::reinstate,
        admin_handler::list_audit_logs,
    ),
    components(
        schemas(
            // Domain types
            Role,
            SellerStatus,
            AdminRole,
            RequestStatus,
            AuditAction,
            AuditTarget,
            UserResponse,
            FarmDetails,
            RegistrationResponse,
            PendingRegistration,
            AuditLogEntry,
            AuditLogPage,
            PaginationMeta,
            TokenResponse,
            // Request/response bodies
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            registration_handler::SubmitRegistrationRequest,
            admin_handler::PendingListResponse,
            admin_handler::ApproveRequest,
            admin_handler::RejectRequest,
            admin_handler::ReopenRequest,
            admin_handler::SuspendRequest,
            admin_handler::ReinstateRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Buyer signup and login"),
        (name = "Seller Registrations", description = "Applying to become a seller"),
        (name = "Admin", description = "Seller review, standing and audit trail")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_workflow_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/users/me",
            "/seller-registrations",
            "/admin/seller-registrations/pending",
            "/admin/seller-registrations/{id}/approve",
            "/admin/seller-registrations/{id}/reject",
            "/admin/audit-logs",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {}",
                expected
            );
        }
    }
}
