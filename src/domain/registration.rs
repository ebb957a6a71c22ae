//! Seller registration requests.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Review status of a single application.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive farm and storefront details supplied by the applicant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FarmDetails {
    #[schema(example = "Green Acres")]
    pub farm_name: String,
    #[schema(example = "Yolo County, CA")]
    pub farm_location: Option<String>,
    #[schema(example = "tomatoes, peppers")]
    pub products_grown: Option<String>,
    #[schema(example = "Green Acres Market")]
    pub store_name: Option<String>,
    pub store_description: Option<String>,
}

/// One seller application by one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub id: i32,
    pub user_id: i32,
    pub farm: FarmDetails,
    pub status: RequestStatus,
    pub rejection_reason: Option<String>,
    pub admin_notes: Option<String>,
    pub documents_verified: bool,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegistrationRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// A pending request joined with the applicant's contact details.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PendingRegistration {
    #[schema(example = 7)]
    pub id: i32,
    pub farm_name: String,
    pub seller_email: String,
    pub seller_full_name: String,
    pub store_name: Option<String>,
    pub products_grown: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Registration request as returned to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RegistrationResponse {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = 42)]
    pub user_id: i32,
    pub farm_name: String,
    pub farm_location: Option<String>,
    pub products_grown: Option<String>,
    pub store_name: Option<String>,
    pub store_description: Option<String>,
    pub status: RequestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub documents_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

impl From<RegistrationRequest> for RegistrationResponse {
    fn from(request: RegistrationRequest) -> Self {
        let FarmDetails {
            farm_name,
            farm_location,
            products_grown,
            store_name,
            store_description,
        } = request.farm;

        Self {
            id: request.id,
            user_id: request.user_id,
            farm_name,
            farm_location,
            products_grown,
            store_name,
            store_description,
            status: request.status,
            rejection_reason: request.rejection_reason,
            admin_notes: request.admin_notes,
            documents_verified: request.documents_verified,
            reviewed_by: request.reviewed_by,
            reviewed_at: request.reviewed_at,
            approved_at: request.approved_at,
            submitted_at: request.created_at,
        }
    }
}
