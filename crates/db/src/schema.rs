//! Startup schema capability check.
//!
//! Databases that have not run every migration are still served, with the
//! affected features narrowed. The check runs once and the result is handed
//! to the repositories by value.

use pic4pick_common::AppResult;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};
use serde::Serialize;
use tracing::{info, warn};

/// Optional schema features detected in the connected database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SchemaCapabilities {
    /// `photos.hidden` exists.
    pub has_hidden: bool,
    /// All camera metadata columns exist on `photos`.
    pub has_camera_metadata: bool,
    /// `photos.lat` and `photos.lng` exist.
    pub has_geo: bool,
    /// `deleted_categories_log` exists.
    pub has_archive_table: bool,
    /// `app_settings` exists.
    pub has_settings_table: bool,
}

impl SchemaCapabilities {
    /// Capabilities of a fully migrated database.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            has_hidden: true,
            has_camera_metadata: true,
            has_geo: true,
            has_archive_table: true,
            has_settings_table: true,
        }
    }

    /// Whether every optional feature is present.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.has_hidden
            && self.has_camera_metadata
            && self.has_geo
            && self.has_archive_table
            && self.has_settings_table
    }

    /// Derive capabilities from the `photos` column names and the table names
    /// present in the current database.
    #[must_use]
    pub fn from_names(photo_columns: &[String], tables: &[String]) -> Self {
        let has_column = |name: &str| photo_columns.iter().any(|c| c.eq_ignore_ascii_case(name));
        let has_table = |name: &str| tables.iter().any(|t| t.eq_ignore_ascii_case(name));

        Self {
            has_hidden: has_column("hidden"),
            has_camera_metadata: CAMERA_COLUMNS.iter().all(|c| has_column(c)),
            has_geo: has_column("lat") && has_column("lng"),
            has_archive_table: has_table("deleted_categories_log"),
            has_settings_table: has_table("app_settings"),
        }
    }

    /// Introspect `information_schema` for the connected database.
    pub async fn inspect(db: &DatabaseConnection) -> AppResult<Self> {
        let columns = query_names(
            db,
            "SELECT COLUMN_NAME AS name FROM information_schema.COLUMNS \
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = 'photos'",
        )
        .await?;
        let tables = query_names(
            db,
            "SELECT TABLE_NAME AS name FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = DATABASE()",
        )
        .await?;

        let caps = Self::from_names(&columns, &tables);
        if caps.is_complete() {
            info!("Database schema is fully migrated");
        } else {
            warn!(
                has_hidden = caps.has_hidden,
                has_camera_metadata = caps.has_camera_metadata,
                has_geo = caps.has_geo,
                has_archive_table = caps.has_archive_table,
                has_settings_table = caps.has_settings_table,
                "Database schema is behind; some features are degraded until migrations run"
            );
        }
        Ok(caps)
    }
}

impl Default for SchemaCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// Camera metadata columns on `photos`.
pub const CAMERA_COLUMNS: [&str; 6] = [
    "focal_length",
    "aperture",
    "shutter_speed",
    "iso",
    "camera",
    "lens",
];

async fn query_names(db: &DatabaseConnection, sql: &str) -> AppResult<Vec<String>> {
    let rows = db
        .query_all(Statement::from_string(DbBackend::MySql, sql))
        .await?;
    rows.iter()
        .map(|row| row.try_get::<String>("", "name").map_err(Into::into))
        .collect()
}
