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
                    .table(ActivityLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLogs::UserId).integer().null())
                    .col(ColumnDef::new(ActivityLogs::Action).string().not_null())
                    .col(ColumnDef::new(ActivityLogs::Details).text().null())
                    .col(ColumnDef::new(ActivityLogs::IpAddress).string().null())
                    .col(ColumnDef::new(ActivityLogs::UserAgent).string().null())
                    .col(ColumnDef::new(ActivityLogs::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_activity_logs_user_id")
                            .from(ActivityLogs::Table, ActivityLogs::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_logs_created_at")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_activity_logs_action")
                    .table(ActivityLogs::Table)
                    .col(ActivityLogs::Action)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ActivityLogs {
    Table,
    Id,
    UserId,
    Action,
    Details,
    IpAddress,
    UserAgent,
    CreatedAt,
}
