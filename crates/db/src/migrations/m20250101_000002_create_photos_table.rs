//! Create photos table.
//!
//! Geo, camera and visibility columns arrive in a later migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Photos::Title)
                            .string_len(200)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Photos::Category).string_len(64).null())
                    .col(ColumnDef::new(Photos::Tags).text().null())
                    .col(ColumnDef::new(Photos::Rating).integer().null())
                    .col(ColumnDef::new(Photos::LocationProvince).string_len(64).null())
                    .col(ColumnDef::new(Photos::LocationCity).string_len(64).null())
                    .col(ColumnDef::new(Photos::LocationCountry).string_len(64).null())
                    .col(ColumnDef::new(Photos::OssKey).string_len(512).not_null())
                    .col(ColumnDef::new(Photos::OssUrl).text().null())
                    .col(ColumnDef::new(Photos::ThumbnailUrl).text().null())
                    .col(ColumnDef::new(Photos::PreviewUrl).text().null())
                    .col(
                        ColumnDef::new(Photos::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Photos::RejectReason).text().null())
                    .col(
                        ColumnDef::new(Photos::Likes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Photos::Views)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Photos::UploaderId).big_integer().null())
                    .col(ColumnDef::new(Photos::ShotDate).date().null())
                    .col(
                        ColumnDef::new(Photos::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Photos::UpdatedAt)
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
                    .name("idx_photos_status")
                    .table(Photos::Table)
                    .col(Photos::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photos_category")
                    .table(Photos::Table)
                    .col(Photos::Category)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photos_updated_at")
                    .table(Photos::Table)
                    .col(Photos::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
    Title,
    Category,
    Tags,
    Rating,
    LocationProvince,
    LocationCity,
    LocationCountry,
    OssKey,
    OssUrl,
    ThumbnailUrl,
    PreviewUrl,
    Status,
    RejectReason,
    Likes,
    Views,
    UploaderId,
    ShotDate,
    CreatedAt,
    UpdatedAt,
}
