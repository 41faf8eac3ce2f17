use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Description).text().not_null())
                    .col(ColumnDef::new(Products::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Products::OldPriceCents).big_integer().null())
                    .col(ColumnDef::new(Products::ImageUrl).string().not_null())
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Products::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // JSON array of strings
                    .col(
                        ColumnDef::new(Products::Tags)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Products::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Products::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_products_is_active")
                    .table(Products::Table)
                    .col(Products::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Products {
    Table,
    Id,
    Name,
    Description,
    PriceCents,
    OldPriceCents,
    ImageUrl,
    IsActive,
    IsFeatured,
    Tags,
    CreatedAt,
    UpdatedAt,
}
