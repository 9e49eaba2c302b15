//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_photos_table;
mod m20250101_000003_create_photo_comments_table;
mod m20250101_000004_create_categories_table;
mod m20250101_000005_create_deleted_categories_log_table;
mod m20250101_000006_create_app_settings_table;
mod m20250101_000007_add_photo_geo_camera_visibility;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_photos_table::Migration),
            Box::new(m20250101_000003_create_photo_comments_table::Migration),
            Box::new(m20250101_000004_create_categories_table::Migration),
            Box::new(m20250101_000005_create_deleted_categories_log_table::Migration),
            Box::new(m20250101_000006_create_app_settings_table::Migration),
            Box::new(m20250101_000007_add_photo_geo_camera_visibility::Migration),
        ]
    }
}
