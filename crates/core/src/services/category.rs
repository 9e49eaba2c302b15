//! Category service.

use chrono::Utc;
use pic4pick_common::{AppError, AppResult};
use pic4pick_db::{
    entities::{
        category::{self, FilterType},
        deleted_category_log,
    },
    repositories::CategoryRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, max = 50, message = "Category name must be 1-50 characters"))]
    pub name: String,
    #[serde(default)]
    pub filter_type: Option<FilterType>,
    #[serde(default)]
    pub filter_tags: Option<String>,
}

/// Partial update of a category.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCategoryInput {
    #[validate(length(min = 1, max = 50, message = "Category name must be 1-50 characters"))]
    pub name: Option<String>,
    pub filter_type: Option<FilterType>,
    pub filter_tags: Option<String>,
}

/// Trim and dedupe a comma list. Full-width commas count as separators.
#[must_use]
pub fn normalize_tags(raw: &str) -> Option<String> {
    let mut tags: Vec<&str> = Vec::new();
    for tag in raw.split([',', '，']).map(str::trim) {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    (!tags.is_empty()).then(|| tags.join(","))
}

/// Service for managing photo categories.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self { category_repo }
    }

    pub async fn list_active(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_active().await
    }

    pub async fn list_deleted(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_deleted().await
    }

    /// Permanently deleted categories, newest first.
    pub async fn list_archived(&self, limit: u64) -> AppResult<Vec<deleted_category_log::Model>> {
        self.category_repo.find_archived(limit.clamp(1, 200)).await
    }

    /// Create a category at the end of the display order.
    pub async fn create(&self, input: CreateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }
        self.ensure_name_free(&name, None).await?;

        let sort_order = self.category_repo.next_sort_order().await?;
        let now = Utc::now();
        self.category_repo
            .create(category::ActiveModel {
                name: Set(name),
                sort_order: Set(sort_order),
                filter_type: Set(input.filter_type.unwrap_or(FilterType::Manual)),
                filter_tags: Set(input.filter_tags.as_deref().and_then(normalize_tags)),
                is_system: Set(false),
                deleted_at: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .await
    }

    /// Update an active category.
    pub async fn update(&self, id: i64, input: UpdateCategoryInput) -> AppResult<category::Model> {
        input.validate()?;
        let existing = self.category_repo.get_by_id(id).await?;
        if existing.is_deleted() {
            return Err(AppError::NotFound(format!("Category: {id}")));
        }

        let mut active: category::ActiveModel = existing.clone().into();

        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AppError::Validation("Category name is required".to_string()));
            }
            if name != existing.name {
                self.ensure_name_free(&name, Some(id)).await?;
                active.name = Set(name);
            }
        }
        if let Some(filter_type) = input.filter_type {
            active.filter_type = Set(filter_type);
        }
        if let Some(tags) = input.filter_tags {
            active.filter_tags = Set(normalize_tags(&tags));
        }

        active.updated_at = Set(Utc::now());
        self.category_repo.update(active).await
    }

    pub async fn soft_delete(&self, id: i64) -> AppResult<category::Model> {
        self.category_repo.soft_delete(id).await
    }

    pub async fn restore(&self, id: i64) -> AppResult<category::Model> {
        self.category_repo.restore(id).await
    }

    pub async fn delete_permanently(&self, id: i64) -> AppResult<deleted_category_log::Model> {
        let archived = self.category_repo.delete_permanently(id).await?;
        tracing::info!(category_id = id, name = %archived.name, "Category permanently deleted");
        Ok(archived)
    }

    pub async fn reorder(&self, ids: &[i64]) -> AppResult<()> {
        if ids.is_empty() {
            return Err(AppError::Validation("ids must not be empty".to_string()));
        }
        self.category_repo.reorder(ids).await
    }

    async fn ensure_name_free(&self, name: &str, exclude_id: Option<i64>) -> AppResult<()> {
        if self.category_repo.active_name_taken(name, exclude_id).await? {
            return Err(AppError::BadRequest(format!(
                "Category \"{name}\" already exists"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pic4pick_db::SchemaCapabilities;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    fn category_row(id: i64, name: &str, sort_order: i32) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
            sort_order,
            filter_type: FilterType::Manual,
            filter_tags: None,
            is_system: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn count_row(n: i32) -> std::collections::BTreeMap<&'static str, Value> {
        maplit::btreemap! { "num_items" => Value::Int(Some(n)) }
    }

    fn service(db: MockDatabase) -> CategoryService {
        let db = Arc::new(db.into_connection());
        CategoryService::new(CategoryRepository::new(db, SchemaCapabilities::full()))
    }

    #[test]
    fn test_normalize_tags() {
        assert_eq!(normalize_tags(" 海, 山，海 ,,").as_deref(), Some("海,山"));
        assert_eq!(normalize_tags(" , "), None);
    }

    #[tokio::test]
    async fn test_create_appends_after_last() {
        let mut created = category_row(9, "风光", 5);
        created.filter_tags = Some("山,海".to_string());
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[count_row(0)]])
                .append_query_results([[maplit::btreemap! {
                    "max_sort_order" => Value::Int(Some(4)),
                }]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 9,
                    rows_affected: 1,
                }])
                .append_query_results([[created]]),
        );

        let category = service
            .create(CreateCategoryInput {
                name: " 风光 ".to_string(),
                filter_type: None,
                filter_tags: Some("山, 海".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(category.sort_order, 5);
        assert_eq!(category.filter_type, FilterType::Manual);
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql).append_query_results([[count_row(1)]]),
        );

        let result = service
            .create(CreateCategoryInput {
                name: "风光".to_string(),
                filter_type: Some(FilterType::Tag),
                filter_tags: None,
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let service = service(MockDatabase::new(DatabaseBackend::MySql));
        let result = service
            .create(CreateCategoryInput {
                name: "   ".to_string(),
                filter_type: None,
                filter_tags: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_deleted_category_is_not_found() {
        let mut deleted = category_row(3, "旧", 2);
        deleted.deleted_at = Some(Utc::now());
        let service =
            service(MockDatabase::new(DatabaseBackend::MySql).append_query_results([[deleted]]));

        let result = service
            .update(
                3,
                UpdateCategoryInput {
                    name: Some("新".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reorder_requires_ids() {
        let service = service(MockDatabase::new(DatabaseBackend::MySql));
        assert!(matches!(
            service.reorder(&[]).await,
            Err(AppError::Validation(_))
        ));
    }
}
