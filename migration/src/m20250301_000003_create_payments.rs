use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_users::Users;
use crate::m20250301_000002_create_products::Products;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::UserId).integer().not_null())
                    .col(ColumnDef::new(Payments::ProductId).integer().not_null())
                    .col(ColumnDef::new(Payments::AmountCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Payments::ProofImageUrl).string().null())
                    .col(ColumnDef::new(Payments::RejectionReason).text().null())
                    .col(ColumnDef::new(Payments::ApprovedBy).integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Payments::ProcessedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_user_id")
                            .from(Payments::Table, Payments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_product_id")
                            .from(Payments::Table, Payments::ProductId)
                            .to(Products::Table, Products::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_approved_by")
                            .from(Payments::Table, Payments::ApprovedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_status")
                    .table(Payments::Table)
                    .col(Payments::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_user_id")
                    .table(Payments::Table)
                    .col(Payments::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    UserId,
    ProductId,
    AmountCents,
    Status,
    ProofImageUrl,
    RejectionReason,
    ApprovedBy,
    CreatedAt,
    ProcessedAt,
}
