use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdminRequests::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(AdminRequests::RequestedRole)
                            .string_len(16)
                            .not_null()
                            .default("admin"),
                    )
                    .col(
                        ColumnDef::new(AdminRequests::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(AdminRequests::ApprovedBy).integer().null())
                    .col(ColumnDef::new(AdminRequests::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(AdminRequests::ProcessedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_requests_user_id")
                            .from(AdminRequests::Table, AdminRequests::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_requests_approved_by")
                            .from(AdminRequests::Table, AdminRequests::ApprovedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AdminRequests {
    Table,
    Id,
    UserId,
    RequestedRole,
    Status,
    ApprovedBy,
    CreatedAt,
    ProcessedAt,
}
