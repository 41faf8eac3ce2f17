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
                    .table(SystemSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SystemSettings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SystemSettings::Key)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    // JSON encoded value
                    .col(ColumnDef::new(SystemSettings::Value).text().not_null())
                    .col(ColumnDef::new(SystemSettings::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(SystemSettings::UpdatedBy).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_system_settings_updated_by")
                            .from(SystemSettings::Table, SystemSettings::UpdatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Warnings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warnings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Warnings::Message).text().not_null())
                    .col(
                        ColumnDef::new(Warnings::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Warnings::CreatedBy).integer().null())
                    .col(ColumnDef::new(Warnings::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_warnings_created_by")
                            .from(Warnings::Table, Warnings::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Warnings::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SystemSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SystemSettings {
    Table,
    Id,
    Key,
    Value,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum Warnings {
    Table,
    Id,
    Message,
    IsActive,
    CreatedBy,
    CreatedAt,
}
