//! Site settings service.

use std::collections::{BTreeMap, HashMap};

use pic4pick_common::AppResult;
use pic4pick_db::repositories::SettingsRepository;

/// Keys the settings store accepts.
pub const ALLOWED_KEYS: [&str; 14] = [
    "site_title",
    "site_subtitle",
    "site_description",
    "site_logo",
    "icp_number",
    "contact_email",
    "footer_text",
    "amap_key",
    "amap_security_code",
    "oss_region",
    "oss_bucket",
    "oss_endpoint",
    "oss_access_key_id",
    "oss_access_key_secret",
];

/// Keys safe to expose to anonymous visitors.
pub const PUBLIC_KEYS: [&str; 9] = [
    "site_title",
    "site_subtitle",
    "site_description",
    "site_logo",
    "icp_number",
    "contact_email",
    "footer_text",
    "amap_key",
    "amap_security_code",
];

/// Service for site settings.
#[derive(Clone)]
pub struct SettingsService {
    settings_repo: SettingsRepository,
}

impl SettingsService {
    /// Create a new settings service.
    #[must_use]
    pub const fn new(settings_repo: SettingsRepository) -> Self {
        Self { settings_repo }
    }

    /// Every allowed key. Keys never saved map to "".
    pub async fn get_all(&self) -> AppResult<BTreeMap<String, String>> {
        self.load(&ALLOWED_KEYS).await
    }

    /// The non-sensitive subset.
    pub async fn get_public(&self) -> AppResult<BTreeMap<String, String>> {
        self.load(&PUBLIC_KEYS).await
    }

    /// Save allowed keys and drop the rest. Returns the full settings after
    /// the write.
    pub async fn save(&self, values: HashMap<String, String>) -> AppResult<BTreeMap<String, String>> {
        let pairs: Vec<(String, String)> = values
            .into_iter()
            .filter(|(key, _)| ALLOWED_KEYS.contains(&key.as_str()))
            .collect();

        if !pairs.is_empty() {
            let count = pairs.len();
            self.settings_repo.upsert_many(pairs).await?;
            tracing::info!(count, "Settings saved");
        }
        self.get_all().await
    }

    async fn load(&self, keys: &[&str]) -> AppResult<BTreeMap<String, String>> {
        let mut stored = self.settings_repo.get_many(keys).await?;
        Ok(keys
            .iter()
            .map(|key| {
                let value = stored.remove(*key).unwrap_or_default();
                ((*key).to_string(), value)
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pic4pick_db::SchemaCapabilities;
    use pic4pick_db::entities::app_setting;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn setting(key: &str, value: &str) -> app_setting::Model {
        app_setting::Model {
            setting_key: key.to_string(),
            setting_value: value.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_keys_are_allowed_and_exclude_credentials() {
        for key in PUBLIC_KEYS {
            assert!(ALLOWED_KEYS.contains(&key));
        }
        assert!(!PUBLIC_KEYS.iter().any(|k| k.starts_with("oss_")));
    }

    #[tokio::test]
    async fn test_missing_keys_default_to_empty() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[setting("site_title", "Pic4Pick")]])
                .into_connection(),
        );
        let service = SettingsService::new(SettingsRepository::new(db, SchemaCapabilities::full()));

        let public = service.get_public().await.unwrap();
        assert_eq!(public.len(), PUBLIC_KEYS.len());
        assert_eq!(public["site_title"], "Pic4Pick");
        assert_eq!(public["icp_number"], "");
    }

    #[tokio::test]
    async fn test_missing_table_reads_as_empty() {
        let caps = SchemaCapabilities {
            has_settings_table: false,
            ..SchemaCapabilities::full()
        };
        let db = Arc::new(MockDatabase::new(DatabaseBackend::MySql).into_connection());
        let service = SettingsService::new(SettingsRepository::new(db, caps));

        let all = service.get_all().await.unwrap();
        assert!(all.values().all(String::is_empty));
    }

    #[tokio::test]
    async fn test_save_with_only_unknown_keys_writes_nothing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<app_setting::Model>::new()])
                .into_connection(),
        );
        let service = SettingsService::new(SettingsRepository::new(db, SchemaCapabilities::full()));

        let saved = service
            .save(HashMap::from([("admin_password".to_string(), "x".to_string())]))
            .await
            .unwrap();
        assert!(!saved.contains_key("admin_password"));
    }
}
