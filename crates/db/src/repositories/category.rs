//! Category repository.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use pic4pick_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entities::{Category, DeletedCategoryLog, category, deleted_category_log};
use crate::schema::SchemaCapabilities;

/// Category repository for database operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
    caps: SchemaCapabilities,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, caps: SchemaCapabilities) -> Self {
        Self { db, caps }
    }

    /// Find a category by ID, deleted or not.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a category by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<category::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category: {id}")))
    }

    /// Active categories in display order.
    pub async fn find_active(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .filter(category::Column::DeletedAt.is_null())
            .order_by_asc(category::Column::SortOrder)
            .order_by_asc(category::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Soft-deleted categories, most recently deleted first.
    pub async fn find_deleted(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .filter(category::Column::DeletedAt.is_not_null())
            .order_by_desc(category::Column::DeletedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Whether an active category other than `exclude_id` owns `name`.
    pub async fn active_name_taken(&self, name: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let mut query = Category::find()
            .filter(category::Column::Name.eq(name))
            .filter(category::Column::DeletedAt.is_null());
        if let Some(id) = exclude_id {
            query = query.filter(category::Column::Id.ne(id));
        }

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(count > 0)
    }

    /// Sort position just past the last active category.
    pub async fn next_sort_order(&self) -> AppResult<i32> {
        let max: Option<Option<i32>> = Category::find()
            .filter(category::Column::DeletedAt.is_null())
            .select_only()
            .column_as(category::Column::SortOrder.max(), "max_sort_order")
            .into_tuple()
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(max.flatten().unwrap_or(0) + 1)
    }

    /// Create a new category.
    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a category.
    pub async fn update(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Mark an active category as deleted.
    pub async fn soft_delete(&self, id: i64) -> AppResult<category::Model> {
        let existing = self.get_by_id(id).await?;
        if existing.is_deleted() {
            return Err(AppError::NotFound(format!("Category: {id}")));
        }

        let now = Utc::now();
        let mut active: category::ActiveModel = existing.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        self.update(active).await
    }

    /// Bring a soft-deleted category back.
    pub async fn restore(&self, id: i64) -> AppResult<category::Model> {
        let existing = self.get_by_id(id).await?;
        if !existing.is_deleted() {
            return Err(AppError::BadRequest(format!(
                "Category {id} is not deleted"
            )));
        }
        if self.active_name_taken(&existing.name, Some(id)).await? {
            return Err(AppError::BadRequest(format!(
                "An active category named \"{}\" already exists",
                existing.name
            )));
        }

        let mut active: category::ActiveModel = existing.into();
        active.deleted_at = Set(None);
        active.updated_at = Set(Utc::now());
        self.update(active).await
    }

    /// Assign `sort_order = position + 1` to each id, all or nothing.
    pub async fn reorder(&self, ids: &[i64]) -> AppResult<()> {
        let unique: HashSet<i64> = ids.iter().copied().collect();
        if unique.len() != ids.len() {
            return Err(AppError::BadRequest(
                "Category ids must not repeat".to_string(),
            ));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let found = Category::find()
            .filter(category::Column::Id.is_in(ids.iter().copied()))
            .filter(category::Column::DeletedAt.is_null())
            .count(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if found != ids.len() as u64 {
            return Err(AppError::BadRequest(
                "Reorder references unknown or deleted categories".to_string(),
            ));
        }

        let now = Utc::now();
        for (position, id) in (1_i32..).zip(ids.iter().copied()) {
            Category::update_many()
                .col_expr(category::Column::SortOrder, Expr::value(position))
                .col_expr(category::Column::UpdatedAt, Expr::value(now))
                .filter(category::Column::Id.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Archive a soft-deleted category and remove it, in one transaction.
    pub async fn delete_permanently(&self, id: i64) -> AppResult<deleted_category_log::Model> {
        if !self.caps.has_archive_table {
            return Err(AppError::MigrationRequired(
                "Category archive table is missing".to_string(),
            ));
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let existing = Category::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| AppError::NotFound(format!("Category: {id}")))?;

        let Some(deleted_at) = existing.deleted_at else {
            return Err(AppError::BadRequest(
                "Only deleted categories can be permanently deleted".to_string(),
            ));
        };
        if existing.is_system {
            return Err(AppError::BadRequest(
                "System categories cannot be permanently deleted".to_string(),
            ));
        }

        let archived = deleted_category_log::ActiveModel {
            category_id: Set(existing.id),
            name: Set(existing.name.clone()),
            sort_order: Set(existing.sort_order),
            filter_type: Set(existing.filter_type),
            filter_tags: Set(existing.filter_tags.clone()),
            is_system: Set(existing.is_system),
            created_at: Set(existing.created_at),
            updated_at: Set(existing.updated_at),
            deleted_at: Set(deleted_at),
            purged_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Category::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(archived)
    }

    /// Archived categories, newest purge first.
    pub async fn find_archived(&self, limit: u64) -> AppResult<Vec<deleted_category_log::Model>> {
        if !self.caps.has_archive_table {
            return Ok(Vec::new());
        }
        DeletedCategoryLog::find()
            .order_by_desc(deleted_category_log::Column::PurgedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
