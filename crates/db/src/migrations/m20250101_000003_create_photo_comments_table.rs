//! Create photo_comments table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PhotoComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhotoComments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PhotoComments::PhotoId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PhotoComments::Author).string_len(50).null())
                    .col(ColumnDef::new(PhotoComments::Content).text().not_null())
                    .col(ColumnDef::new(PhotoComments::Ip).string_len(64).null())
                    .col(ColumnDef::new(PhotoComments::UserId).big_integer().null())
                    .col(ColumnDef::new(PhotoComments::Username).string_len(64).null())
                    .col(
                        ColumnDef::new(PhotoComments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_comments_photo")
                            .from(PhotoComments::Table, PhotoComments::PhotoId)
                            .to(Photos::Table, Photos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photo_comments_photo_id")
                    .table(PhotoComments::Table)
                    .col(PhotoComments::PhotoId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PhotoComments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PhotoComments {
    Table,
    Id,
    PhotoId,
    Author,
    Content,
    Ip,
    UserId,
    Username,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
}
