//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{AdminRole, Role, SellerStatus, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub seller_status: SellerStatus,
    pub admin_role: Option<AdminRole>,
    pub seller_approval_date: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::seller_registration::Entity")]
    SellerRegistrations,
}

impl Related<super::seller_registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SellerRegistrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            email: model.email,
            phone: model.phone,
            full_name: model.full_name,
            password_hash: model.password_hash,
            role: model.role,
            seller_status: model.seller_status,
            admin_role: model.admin_role,
            seller_approval_date: model.seller_approval_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
