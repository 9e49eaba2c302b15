//! Site settings repository.
//!
//! The table may be absent on older installs. Reads then yield nothing and
//! the first write creates it.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use pic4pick_common::{AppError, AppResult};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::info;

use crate::entities::{AppSetting, app_setting};
use crate::schema::SchemaCapabilities;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS app_settings (\
     setting_key VARCHAR(64) NOT NULL PRIMARY KEY, \
     setting_value TEXT NOT NULL, \
     updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\
     ) DEFAULT CHARSET = utf8mb4";

/// Settings repository for database operations.
#[derive(Clone)]
pub struct SettingsRepository {
    db: Arc<DatabaseConnection>,
    table_ready: Arc<AtomicBool>,
}

impl SettingsRepository {
    /// Create a new settings repository.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, caps: SchemaCapabilities) -> Self {
        Self {
            db,
            table_ready: Arc::new(AtomicBool::new(caps.has_settings_table)),
        }
    }

    /// Stored values for `keys`. Keys without a row are absent from the map.
    pub async fn get_many(&self, keys: &[&str]) -> AppResult<HashMap<String, String>> {
        if !self.table_ready.load(Ordering::Acquire) {
            return Ok(HashMap::new());
        }

        let rows = AppSetting::find()
            .filter(app_setting::Column::SettingKey.is_in(keys.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.setting_key, row.setting_value))
            .collect())
    }

    /// Insert or overwrite each pair in one transaction.
    pub async fn upsert_many(&self, pairs: Vec<(String, String)>) -> AppResult<()> {
        if pairs.is_empty() {
            return Ok(());
        }
        self.ensure_table().await?;

        let now = Utc::now();
        let models = pairs.into_iter().map(|(key, value)| app_setting::ActiveModel {
            setting_key: Set(key),
            setting_value: Set(value),
            updated_at: Set(now),
        });

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        AppSetting::insert_many(models)
            .on_conflict(
                OnConflict::column(app_setting::Column::SettingKey)
                    .update_columns([
                        app_setting::Column::SettingValue,
                        app_setting::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn ensure_table(&self) -> AppResult<()> {
        if self.table_ready.load(Ordering::Acquire) {
            return Ok(());
        }

        self.db
            .execute_unprepared(CREATE_TABLE_SQL)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        self.table_ready.store(true, Ordering::Release);
        info!("Created app_settings table");
        Ok(())
    }
}
