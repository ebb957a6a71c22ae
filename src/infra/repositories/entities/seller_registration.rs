//! Seller registration request entity.

use sea_orm::entity::prelude::*;

use crate::domain::{FarmDetails, RegistrationRequest, RequestStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "seller_registration_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub farm_name: String,
    #[sea_orm(nullable)]
    pub farm_location: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub products_grown: Option<String>,
    #[sea_orm(nullable)]
    pub store_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub store_description: Option<String>,
    pub status: RequestStatus,
    /// Set iff the request was rejected
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub admin_notes: Option<String>,
    pub documents_verified: bool,
    /// Admin who made the decision
    #[sea_orm(nullable)]
    pub reviewed_by: Option<i32>,
    #[sea_orm(nullable)]
    pub reviewed_at: Option<DateTimeUtc>,
    #[sea_orm(nullable)]
    pub approved_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for RegistrationRequest {
    fn from(model: Model) -> Self {
        RegistrationRequest {
            id: model.id,
            user_id: model.user_id,
            farm: FarmDetails {
                farm_name: model.farm_name,
                farm_location: model.farm_location,
                products_grown: model.products_grown,
                store_name: model.store_name,
                store_description: model.store_description,
            },
            status: model.status,
            rejection_reason: model.rejection_reason,
            admin_notes: model.admin_notes,
            documents_verified: model.documents_verified,
            reviewed_by: model.reviewed_by,
            reviewed_at: model.reviewed_at,
            approved_at: model.approved_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
