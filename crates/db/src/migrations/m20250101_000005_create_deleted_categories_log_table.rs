//! Create the archive table for permanently deleted categories.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeletedCategoriesLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::Name)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::SortOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::FilterType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeletedCategoriesLog::FilterTags).text().null())
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::IsSystem)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::DeletedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeletedCategoriesLog::PurgedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deleted_categories_log_category_id")
                    .table(DeletedCategoriesLog::Table)
                    .col(DeletedCategoriesLog::CategoryId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeletedCategoriesLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DeletedCategoriesLog {
    Table,
    Id,
    CategoryId,
    Name,
    SortOrder,
    FilterType,
    FilterTags,
    IsSystem,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
    PurgedAt,
}
