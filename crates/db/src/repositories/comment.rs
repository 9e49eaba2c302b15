//! Photo comment repository.

use std::sync::Arc;

use pic4pick_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::{PhotoComment, photo_comment};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Comments on a photo, oldest first.
    pub async fn find_by_photo(&self, photo_id: i64) -> AppResult<Vec<photo_comment::Model>> {
        PhotoComment::find()
            .filter(photo_comment::Column::PhotoId.eq(photo_id))
            .order_by_asc(photo_comment::Column::CreatedAt)
            .order_by_asc(photo_comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new comment.
    pub async fn create(
        &self,
        model: photo_comment::ActiveModel,
    ) -> AppResult<photo_comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = PhotoComment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
