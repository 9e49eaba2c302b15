//! Photo comment service.

use chrono::Utc;
use pic4pick_common::{AppError, AppResult};
use pic4pick_db::{
    entities::photo_comment,
    repositories::{CommentRepository, PhotoRepository},
};
use sea_orm::Set;
use serde::Deserialize;

use super::auth::Identity;

pub const MAX_CONTENT_CHARS: usize = 1000;
pub const MAX_AUTHOR_CHARS: usize = 50;

/// Input for posting a comment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentInput {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Client address from proxy headers.
///
/// Takes the first hop of `X-Forwarded-For`, then `X-Real-IP`, and strips
/// the IPv4-mapped `::ffff:` prefix.
#[must_use]
pub fn normalize_ip(forwarded_for: Option<&str>, real_ip: Option<&str>) -> Option<String> {
    let raw = forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| real_ip.map(str::trim).filter(|value| !value.is_empty()))?;

    let ip = raw.strip_prefix("::ffff:").unwrap_or(raw);
    Some(ip.to_string())
}

/// Service for photo comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    photo_repo: PhotoRepository,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(comment_repo: CommentRepository, photo_repo: PhotoRepository) -> Self {
        Self {
            comment_repo,
            photo_repo,
        }
    }

    /// Comments on a photo, oldest first.
    pub async fn list(
        &self,
        photo_id: i64,
        viewer: Option<&Identity>,
    ) -> AppResult<Vec<photo_comment::Model>> {
        self.ensure_photo_visible(photo_id, viewer).await?;
        self.comment_repo.find_by_photo(photo_id).await
    }

    /// Post a comment on a photo.
    pub async fn create(
        &self,
        photo_id: i64,
        input: CreateCommentInput,
        viewer: Option<&Identity>,
        ip: Option<String>,
    ) -> AppResult<photo_comment::Model> {
        let content = input.content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Comment content is required".to_string()));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(AppError::Validation(format!(
                "Comment content must be at most {MAX_CONTENT_CHARS} characters"
            )));
        }

        let author = input
            .author
            .as_deref()
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(ToString::to_string);
        if author
            .as_deref()
            .is_some_and(|author| author.chars().count() > MAX_AUTHOR_CHARS)
        {
            return Err(AppError::Validation(format!(
                "Author name must be at most {MAX_AUTHOR_CHARS} characters"
            )));
        }

        self.ensure_photo_visible(photo_id, viewer).await?;

        let author = author.or_else(|| viewer.map(|v| v.username.clone()));
        let comment = self
            .comment_repo
            .create(photo_comment::ActiveModel {
                photo_id: Set(photo_id),
                author: Set(author),
                content: Set(content.to_string()),
                ip: Set(ip),
                user_id: Set(viewer.map(|v| v.id)),
                username: Set(viewer.map(|v| v.username.clone())),
                created_at: Set(Utc::now()),
                ..Default::default()
            })
            .await?;

        tracing::debug!(photo_id, comment_id = comment.id, "Comment created");
        Ok(comment)
    }

    /// Delete a comment.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.comment_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Comment: {id}")));
        }
        Ok(())
    }

    async fn ensure_photo_visible(&self, photo_id: i64, viewer: Option<&Identity>) -> AppResult<()> {
        let photo = self.photo_repo.get_by_id(photo_id).await?;
        if viewer.is_none() && !photo.is_publicly_visible() {
            return Err(AppError::NotFound(format!("Photo: {photo_id}")));
        }
        Ok(())
    }
}
