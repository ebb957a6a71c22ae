//! Migration: seller registration requests.
//!
//! A partial unique index keeps at most one pending request per user, even
//! when two submissions race past the application-level check.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SellerRegistrationRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::UserId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::FarmName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SellerRegistrationRequests::FarmLocation).string().null())
                    .col(ColumnDef::new(SellerRegistrationRequests::ProductsGrown).text().null())
                    .col(ColumnDef::new(SellerRegistrationRequests::StoreName).string().null())
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::StoreDescription)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::RejectionReason)
                            .text()
                            .null(),
                    )
                    .col(ColumnDef::new(SellerRegistrationRequests::AdminNotes).text().null())
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::DocumentsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::ReviewedBy)
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SellerRegistrationRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seller_registration_requests_user")
                            .from(
                                SellerRegistrationRequests::Table,
                                SellerRegistrationRequests::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seller_registration_requests_user_id")
                    .table(SellerRegistrationRequests::Table)
                    .col(SellerRegistrationRequests::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seller_registration_requests_status")
                    .table(SellerRegistrationRequests::Table)
                    .col(SellerRegistrationRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r"
                CREATE UNIQUE INDEX IF NOT EXISTS uq_seller_registration_requests_one_pending
                ON seller_registration_requests (user_id)
                WHERE status = 'pending';
                ",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(SellerRegistrationRequests::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum SellerRegistrationRequests {
    Table,
    Id,
    UserId,
    FarmName,
    FarmLocation,
    ProductsGrown,
    StoreName,
    StoreDescription,
    Status,
    RejectionReason,
    AdminNotes,
    DocumentsVerified,
    ReviewedBy,
    ReviewedAt,
    ApprovedAt,
    CreatedAt,
    UpdatedAt,
}
