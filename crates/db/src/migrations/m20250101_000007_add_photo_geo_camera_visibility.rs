//! Add coordinates, camera metadata and the hidden flag to photos.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Photos::Table)
                    .add_column(ColumnDef::new(Photos::Lat).double().null())
                    .add_column(ColumnDef::new(Photos::Lng).double().null())
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Photos::Table)
                    .add_column(
                        ColumnDef::new(Photos::FocalLength).string_len(32).null(),
                    )
                    .add_column(ColumnDef::new(Photos::Aperture).string_len(32).null())
                    .add_column(
                        ColumnDef::new(Photos::ShutterSpeed).string_len(32).null(),
                    )
                    .add_column(ColumnDef::new(Photos::Iso).string_len(32).null())
                    .add_column(ColumnDef::new(Photos::Camera).string_len(128).null())
                    .add_column(ColumnDef::new(Photos::Lens).string_len(128).null())
                    .to_owned(),
            )
            .await?;

        // NULL and false both mean "listed"
        manager
            .alter_table(
                Table::alter()
                    .table(Photos::Table)
                    .add_column(
                        ColumnDef::new(Photos::Hidden).boolean().null().default(false),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Photos::Table)
                    .drop_column(Photos::Hidden)
                    .drop_column(Photos::Lens)
                    .drop_column(Photos::Camera)
                    .drop_column(Photos::Iso)
                    .drop_column(Photos::ShutterSpeed)
                    .drop_column(Photos::Aperture)
                    .drop_column(Photos::FocalLength)
                    .drop_column(Photos::Lng)
                    .drop_column(Photos::Lat)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Photos {
    Table,
    Lat,
    Lng,
    FocalLength,
    Aperture,
    ShutterSpeed,
    Iso,
    Camera,
    Lens,
    Hidden,
}
