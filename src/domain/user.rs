//! User domain entity, primary roles and seller standing.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primary platform role. Exactly one per user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "buyer")]
    Buyer,
    #[sea_orm(string_value = "seller")]
    Seller,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Where a user stands in the seller lifecycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum SellerStatus {
    #[sea_orm(string_value = "none")]
    None,
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "suspended")]
    Suspended,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Admin sub-role. Only meaningful when the primary role is `Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
    #[sea_orm(string_value = "seller_manager")]
    SellerManager,
    #[sea_orm(string_value = "price_manager")]
    PriceManager,
    #[sea_orm(string_value = "order_manager")]
    OrderManager,
}

impl Role {
    /// Whether `status` may be observed together with this role.
    ///
    /// Buyers are either outsiders, applicants or rejected applicants;
    /// sellers are approved or suspended; admins never carry a seller status.
    pub fn permits(&self, status: SellerStatus) -> bool {
        match self {
            Role::Buyer => matches!(
                status,
                SellerStatus::None | SellerStatus::Pending | SellerStatus::Rejected
            ),
            Role::Seller => matches!(status, SellerStatus::Approved | SellerStatus::Suspended),
            Role::Admin => status == SellerStatus::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SellerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SellerStatus::None => "none",
            SellerStatus::Pending => "pending",
            SellerStatus::Approved => "approved",
            SellerStatus::Suspended => "suspended",
            SellerStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for SellerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::SellerManager => "seller_manager",
            AdminRole::PriceManager => "price_manager",
            AdminRole::OrderManager => "order_manager",
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "seller_manager" => Ok(AdminRole::SellerManager),
            "price_manager" => Ok(AdminRole::PriceManager),
            "order_manager" => Ok(AdminRole::OrderManager),
            other => Err(format!("unknown admin role: {}", other)),
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub phone: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub seller_status: SellerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<AdminRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_approval_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Whether the user may file a new seller application right now.
    pub fn may_apply_for_seller(&self) -> bool {
        match (self.role, self.seller_status) {
            (Role::Buyer, SellerStatus::None | SellerStatus::Rejected) => true,
            // Not writable under `Role::permits`; only legacy rows can carry it
            (Role::Seller, SellerStatus::Rejected) => true,
            _ => false,
        }
    }
}

/// Data needed to create a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub phone: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub admin_role: Option<AdminRole>,
}

impl NewUser {
    /// A freshly signed-up marketplace participant.
    pub fn buyer(email: String, phone: String, full_name: String, password_hash: String) -> Self {
        Self {
            email,
            phone,
            full_name,
            password_hash,
            role: Role::Buyer,
            admin_role: None,
        }
    }

    /// A platform administrator with the given sub-role.
    pub fn admin(
        email: String,
        phone: String,
        full_name: String,
        password_hash: String,
        admin_role: AdminRole,
    ) -> Self {
        Self {
            email,
            phone,
            full_name,
            password_hash,
            role: Role::Admin,
            admin_role: Some(admin_role),
        }
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "grower@example.com")]
    pub email: String,
    #[schema(example = "+15550100")]
    pub phone: String,
    #[schema(example = "Jo Grower")]
    pub full_name: String,
    pub role: Role,
    pub seller_status: SellerStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_role: Option<AdminRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_approval_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            phone: user.phone,
            full_name: user.full_name,
            role: user.role,
            seller_status: user.seller_status,
            admin_role: user.admin_role,
            seller_approval_date: user.seller_approval_date,
            created_at: user.created_at,
        }
    }
}
