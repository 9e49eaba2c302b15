//! Create categories table and seed the built-in views.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Built-in categories, in display order.
const SYSTEM_CATEGORIES: [&str; 4] = ["最新", "随览", "附近", "远方"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Categories::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Categories::FilterType)
                            .string_len(16)
                            .not_null()
                            .default("manual"),
                    )
                    .col(ColumnDef::new(Categories::FilterTags).text().null())
                    .col(
                        ColumnDef::new(Categories::IsSystem)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Categories::DeletedAt).timestamp().null())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Categories::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Name uniqueness only binds active rows, so it is enforced by the repository
        manager
            .create_index(
                Index::create()
                    .name("idx_categories_name")
                    .table(Categories::Table)
                    .col(Categories::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_sort_order")
                    .table(Categories::Table)
                    .col(Categories::SortOrder)
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert()
            .into_table(Categories::Table)
            .columns([
                Categories::Name,
                Categories::SortOrder,
                Categories::FilterType,
                Categories::IsSystem,
            ])
            .to_owned();
        for (position, name) in (1_i32..).zip(SYSTEM_CATEGORIES) {
            seed.values([
                name.into(),
                position.into(),
                "manual".into(),
                true.into(),
            ])
            .map_err(|e| DbErr::Migration(e.to_string()))?;
        }
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    SortOrder,
    FilterType,
    FilterTags,
    IsSystem,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}
