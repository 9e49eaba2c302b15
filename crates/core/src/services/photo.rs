//! Photo service: listing, CRUD, review workflow and counters.

use chrono::{NaiveDate, Utc};
use pic4pick_common::{AppError, AppResult};
use pic4pick_db::{
    entities::photo::{self, PhotoStatus},
    repositories::{PhotoFilter, PhotoRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::auth::Identity;
use super::photo_storage::{PhotoStorage, StorageCleanup, StoredPhoto};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Listing query as sent by clients.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPhotosQuery {
    pub status: Option<PhotoStatus>,
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub page: Option<u64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<u64>,
    #[serde(alias = "showHidden")]
    pub show_hidden: Option<bool>,
    #[serde(alias = "userLat")]
    pub lat: Option<f64>,
    #[serde(alias = "userLng")]
    pub lng: Option<f64>,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoListing {
    pub items: Vec<photo::Model>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Input for registering an uploaded photo.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePhotoInput {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: Option<i32>,
    pub location_province: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
    pub focal_length: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    #[serde(default, alias = "ossKey")]
    #[validate(length(min = 1, message = "oss_key is required"))]
    pub oss_key: String,
    #[serde(alias = "ossUrl")]
    pub oss_url: Option<String>,
    #[serde(alias = "thumbnailUrl")]
    pub thumbnail_url: Option<String>,
    #[serde(alias = "previewUrl")]
    pub preview_url: Option<String>,
    pub status: Option<PhotoStatus>,
    pub hidden: Option<bool>,
    /// `YYYY-MM-DD`.
    pub shot_date: Option<String>,
}

impl From<StoredPhoto> for CreatePhotoInput {
    fn from(stored: StoredPhoto) -> Self {
        Self {
            oss_key: stored.oss_key,
            oss_url: Some(stored.oss_url),
            thumbnail_url: stored.thumbnail_url,
            preview_url: stored.preview_url,
            ..Default::default()
        }
    }
}

/// Partial update. Absent fields are left alone; blank strings clear.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePhotoInput {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: Option<i32>,
    pub location_province: Option<String>,
    pub location_city: Option<String>,
    pub location_country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
    pub focal_length: Option<String>,
    pub aperture: Option<String>,
    pub shutter_speed: Option<String>,
    pub iso: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub status: Option<PhotoStatus>,
    pub reject_reason: Option<String>,
    pub hidden: Option<bool>,
    pub shot_date: Option<String>,
}

/// Clamp paging parameters to their defaults and bounds.
#[must_use]
pub fn page_params(page: Option<u64>, page_size: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, page_size)
}

/// Repository filter for a query, applying the viewer's visibility rules.
///
/// Anonymous viewers only ever see approved photos, and only admins may
/// include hidden ones.
#[must_use]
pub fn effective_filter(query: &ListPhotosQuery, viewer: Option<&Identity>) -> PhotoFilter {
    let status = match viewer {
        None => Some(PhotoStatus::Approved),
        Some(_) => query.status,
    };
    let is_admin = viewer.is_some_and(Identity::is_admin);

    PhotoFilter {
        status,
        category: clean(query.category.as_deref()),
        keyword: clean(query.keyword.as_deref()),
        show_hidden: is_admin && query.show_hidden.unwrap_or(false),
        user_lat: query.lat,
        user_lng: query.lng,
    }
}

/// Starting status of a new photo. Non-admin uploads always await review.
#[must_use]
pub fn initial_status(requested: Option<PhotoStatus>, uploader: &Identity) -> PhotoStatus {
    if uploader.is_admin() {
        requested.unwrap_or(PhotoStatus::Approved)
    } else {
        PhotoStatus::Pending
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn parse_shot_date(raw: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation("shot_date must be YYYY-MM-DD".to_string())),
    }
}

/// Service for photos.
#[derive(Clone)]
pub struct PhotoService {
    photo_repo: PhotoRepository,
    storage: PhotoStorage,
}

impl PhotoService {
    /// Create a new photo service.
    #[must_use]
    pub const fn new(photo_repo: PhotoRepository, storage: PhotoStorage) -> Self {
        Self {
            photo_repo,
            storage,
        }
    }

    /// One page of photos visible to `viewer`.
    pub async fn list(
        &self,
        query: &ListPhotosQuery,
        viewer: Option<&Identity>,
    ) -> AppResult<PhotoListing> {
        let (page, page_size) = page_params(query.page, query.page_size);
        let filter = effective_filter(query, viewer);
        let result = self.photo_repo.list(&filter, page, page_size).await?;

        Ok(PhotoListing {
            items: result.items,
            total: result.total,
            page,
            page_size,
        })
    }

    /// A single photo. Anonymous viewers get 404 for anything not public.
    pub async fn get(&self, id: i64, viewer: Option<&Identity>) -> AppResult<photo::Model> {
        let photo = self.photo_repo.get_by_id(id).await?;
        if viewer.is_none() && !photo.is_publicly_visible() {
            return Err(AppError::NotFound(format!("Photo: {id}")));
        }
        Ok(photo)
    }

    /// Store an uploaded file. The record is created separately.
    pub async fn upload(&self, data: Vec<u8>, extension: &str) -> AppResult<StoredPhoto> {
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }
        self.storage.upload_buffer(data, extension).await
    }

    /// Register a photo record for stored assets.
    pub async fn create(&self, input: CreatePhotoInput, uploader: &Identity) -> AppResult<photo::Model> {
        input.validate()?;
        let oss_key = input.oss_key.trim().to_string();
        if oss_key.is_empty() {
            return Err(AppError::Validation("oss_key is required".to_string()));
        }
        let shot_date = parse_shot_date(input.shot_date.as_deref())?;
        let status = initial_status(input.status, uploader);
        let now = Utc::now();

        let photo = self
            .photo_repo
            .create(photo::ActiveModel {
                title: Set(input.title.map(|t| t.trim().to_string()).unwrap_or_default()),
                category: Set(clean(input.category.as_deref())),
                tags: Set(clean(input.tags.as_deref())),
                rating: Set(input.rating),
                location_province: Set(clean(input.location_province.as_deref())),
                location_city: Set(clean(input.location_city.as_deref())),
                location_country: Set(clean(input.location_country.as_deref())),
                lat: Set(input.lat),
                lng: Set(input.lng),
                focal_length: Set(clean(input.focal_length.as_deref())),
                aperture: Set(clean(input.aperture.as_deref())),
                shutter_speed: Set(clean(input.shutter_speed.as_deref())),
                iso: Set(clean(input.iso.as_deref())),
                camera: Set(clean(input.camera.as_deref())),
                lens: Set(clean(input.lens.as_deref())),
                oss_key: Set(oss_key),
                oss_url: Set(clean(input.oss_url.as_deref())),
                thumbnail_url: Set(clean(input.thumbnail_url.as_deref())),
                preview_url: Set(clean(input.preview_url.as_deref())),
                status: Set(status),
                reject_reason: Set(None),
                hidden: Set(Some(input.hidden.unwrap_or(false))),
                likes: Set(0),
                views: Set(0),
                uploader_id: Set(Some(uploader.id)),
                shot_date: Set(shot_date),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            })
            .await?;

        tracing::info!(photo_id = photo.id, status = status.as_str(), "Photo created");
        Ok(photo)
    }

    /// Apply a partial update.
    pub async fn update(&self, id: i64, input: UpdatePhotoInput) -> AppResult<photo::Model> {
        input.validate()?;
        let shot_date = parse_shot_date(input.shot_date.as_deref())?;
        self.photo_repo.get_by_id(id).await?;
        let mut active = photo::ActiveModel::default();

        macro_rules! set_text {
            ($($field:ident),+ $(,)?) => {
                $(if let Some(value) = input.$field.as_deref() {
                    active.$field = Set(clean(Some(value)));
                })+
            };
        }
        set_text!(
            category,
            tags,
            location_province,
            location_city,
            location_country,
            focal_length,
            aperture,
            shutter_speed,
            iso,
            camera,
            lens,
        );

        if let Some(title) = input.title.as_deref() {
            active.title = Set(title.trim().to_string());
        }
        if let Some(rating) = input.rating {
            active.rating = Set(Some(rating));
        }
        if let Some(lat) = input.lat {
            active.lat = Set(Some(lat));
        }
        if let Some(lng) = input.lng {
            active.lng = Set(Some(lng));
        }
        if let Some(hidden) = input.hidden {
            active.hidden = Set(Some(hidden));
        }
        if input.shot_date.is_some() {
            active.shot_date = Set(shot_date);
        }
        if let Some(status) = input.status {
            active.status = Set(status);
            active.reject_reason = Set(match status {
                PhotoStatus::Rejected => clean(input.reject_reason.as_deref()),
                PhotoStatus::Pending | PhotoStatus::Approved => None,
            });
        }

        active.updated_at = Set(Utc::now());
        self.photo_repo.update(id, active).await
    }

    /// Delete the record, then its stored objects.
    ///
    /// The row is gone even when some objects could not be removed; those
    /// keys are reported in the returned cleanup.
    pub async fn delete(&self, id: i64) -> AppResult<StorageCleanup> {
        let photo = self.photo_repo.get_by_id(id).await?;
        if !self.photo_repo.delete(id).await? {
            return Err(AppError::NotFound(format!("Photo: {id}")));
        }

        let cleanup = self.storage.delete_photo_assets(&photo.oss_key).await;
        if cleanup.is_clean() {
            tracing::info!(photo_id = id, "Photo deleted");
        } else {
            tracing::warn!(
                photo_id = id,
                failed_keys = ?cleanup.failed,
                "Photo deleted but some objects were left behind"
            );
        }
        Ok(cleanup)
    }

    pub async fn approve(&self, id: i64) -> AppResult<photo::Model> {
        self.photo_repo
            .set_status(id, PhotoStatus::Approved, None)
            .await
    }

    pub async fn reject(&self, id: i64, reason: Option<String>) -> AppResult<photo::Model> {
        self.photo_repo
            .set_status(id, PhotoStatus::Rejected, clean(reason.as_deref()))
            .await
    }

    /// Counter bumps only reach photos the viewer could open.
    pub async fn like(&self, id: i64, viewer: Option<&Identity>) -> AppResult<i32> {
        self.get(id, viewer).await?;
        self.photo_repo.increment_likes(id).await
    }

    pub async fn unlike(&self, id: i64, viewer: Option<&Identity>) -> AppResult<i32> {
        self.get(id, viewer).await?;
        self.photo_repo.decrement_likes(id).await
    }

    pub async fn view(&self, id: i64, viewer: Option<&Identity>) -> AppResult<i32> {
        self.get(id, viewer).await?;
        self.photo_repo.increment_views(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::services::media::MediaService;
    use crate::services::photo_storage::tests::RecordingStorage;
    use pic4pick_common::config::MediaConfig;
    use pic4pick_db::SchemaCapabilities;
    use pic4pick_db::entities::user::UserRole;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::sync::Arc;

    pub fn photo_row(id: i64, status: PhotoStatus) -> photo::Model {
        photo::Model {
            id,
            title: format!("photo {id}"),
            category: None,
            tags: None,
            rating: None,
            location_province: None,
            location_city: None,
            location_country: None,
            lat: None,
            lng: None,
            focal_length: None,
            aperture: None,
            shutter_speed: None,
            iso: None,
            camera: None,
            lens: None,
            oss_key: format!("photos/original/2024/05/{id}.jpg"),
            oss_url: None,
            thumbnail_url: None,
            preview_url: None,
            status,
            reject_reason: None,
            hidden: Some(false),
            likes: 0,
            views: 0,
            uploader_id: None,
            shot_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn identity(role: UserRole) -> Identity {
        Identity {
            id: 1,
            username: "someone".to_string(),
            role,
        }
    }

    fn service(db: MockDatabase, storage: Arc<RecordingStorage>) -> PhotoService {
        let db = Arc::new(db.into_connection());
        PhotoService::new(
            PhotoRepository::new(db, SchemaCapabilities::full()),
            PhotoStorage::new(storage, MediaService::new(MediaConfig::default())),
        )
    }

    #[test]
    fn test_page_params_defaults_and_bounds() {
        assert_eq!(page_params(None, None), (1, 20));
        assert_eq!(page_params(Some(0), Some(0)), (1, 1));
        assert_eq!(page_params(Some(3), Some(500)), (3, 100));
    }

    #[test]
    fn test_anonymous_viewers_are_pinned_to_approved() {
        let query = ListPhotosQuery {
            status: Some(PhotoStatus::Pending),
            show_hidden: Some(true),
            ..Default::default()
        };
        let filter = effective_filter(&query, None);
        assert_eq!(filter.status, Some(PhotoStatus::Approved));
        assert!(!filter.show_hidden);
    }

    #[test]
    fn test_show_hidden_is_admin_only() {
        let query = ListPhotosQuery {
            status: Some(PhotoStatus::Pending),
            show_hidden: Some(true),
            keyword: Some("  ".to_string()),
            ..Default::default()
        };

        let viewer = effective_filter(&query, Some(&identity(UserRole::Viewer)));
        assert_eq!(viewer.status, Some(PhotoStatus::Pending));
        assert!(!viewer.show_hidden);
        assert!(viewer.keyword.is_none());

        let admin = effective_filter(&query, Some(&identity(UserRole::Admin)));
        assert!(admin.show_hidden);
    }

    #[test]
    fn test_initial_status() {
        let viewer = identity(UserRole::Viewer);
        let admin = identity(UserRole::Admin);
        assert_eq!(
            initial_status(Some(PhotoStatus::Approved), &viewer),
            PhotoStatus::Pending
        );
        assert_eq!(initial_status(None, &admin), PhotoStatus::Approved);
        assert_eq!(
            initial_status(Some(PhotoStatus::Pending), &admin),
            PhotoStatus::Pending
        );
    }

    #[test]
    fn test_shot_date_format() {
        assert!(parse_shot_date(Some("2024-02-29")).unwrap().is_some());
        assert!(parse_shot_date(Some("")).unwrap().is_none());
        assert!(matches!(
            parse_shot_date(Some("29/02/2024")),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_reports_resolved_paging() {
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[photo_row(1, PhotoStatus::Approved)]])
                .append_query_results([[maplit::btreemap! {
                    "total" => Value::BigInt(Some(41)),
                }]]),
            Arc::new(RecordingStorage::default()),
        );

        let listing = service
            .list(
                &ListPhotosQuery {
                    page: Some(3),
                    ..Default::default()
                },
                None,
            )
            .await
            .unwrap();

        assert_eq!(listing.items.len(), 1);
        assert_eq!(listing.total, 41);
        assert_eq!((listing.page, listing.page_size), (3, 20));
    }

    #[tokio::test]
    async fn test_anonymous_get_of_pending_photo_is_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[photo_row(5, PhotoStatus::Pending)]]),
            Arc::new(RecordingStorage::default()),
        );
        assert!(matches!(
            service.get(5, None).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_anonymous_counters_skip_hidden_and_pending_photos() {
        let mut hidden = photo_row(6, PhotoStatus::Approved);
        hidden.hidden = Some(true);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([
                    [photo_row(5, PhotoStatus::Pending)],
                    [photo_row(5, PhotoStatus::Pending)],
                    [hidden],
                ])
                .into_connection(),
        );
        let service = PhotoService::new(
            PhotoRepository::new(Arc::clone(&db), SchemaCapabilities::full()),
            PhotoStorage::new(
                Arc::new(RecordingStorage::default()),
                MediaService::new(MediaConfig::default()),
            ),
        );

        assert!(matches!(service.like(5, None).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.unlike(5, None).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.view(6, None).await, Err(AppError::NotFound(_))));
        drop(service);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let statements = format!("{log:?}");
        assert!(!statements.contains("UPDATE"));
    }

    #[tokio::test]
    async fn test_signed_in_like_on_pending_photo_bumps_counter() {
        let mut liked = photo_row(5, PhotoStatus::Pending);
        liked.likes = 1;
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[photo_row(5, PhotoStatus::Pending)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[liked]]),
            Arc::new(RecordingStorage::default()),
        );
        let viewer = identity(UserRole::Viewer);
        assert_eq!(service.like(5, Some(&viewer)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_validates_rating_and_key() {
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql),
            Arc::new(RecordingStorage::default()),
        );
        let admin = identity(UserRole::Admin);

        let missing_key = service
            .create(CreatePhotoInput::default(), &admin)
            .await;
        assert!(matches!(missing_key, Err(AppError::Validation(_))));

        let bad_rating = service
            .create(
                CreatePhotoInput {
                    oss_key: "photos/original/a.jpg".to_string(),
                    rating: Some(11),
                    ..Default::default()
                },
                &admin,
            )
            .await;
        assert!(matches!(bad_rating, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_row_even_when_storage_fails() {
        let storage = Arc::new(RecordingStorage {
            fail_on: vec!["photos/preview/".to_string()],
            ..Default::default()
        });
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[photo_row(9, PhotoStatus::Approved)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }]),
            storage.clone(),
        );

        let cleanup = service.delete(9).await.unwrap();

        assert_eq!(cleanup.attempted.len(), 3);
        assert_eq!(cleanup.failed, vec!["photos/preview/2024/05/9.jpg"]);
        assert_eq!(storage.deletes.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reject_keeps_trimmed_reason() {
        let mut rejected = photo_row(2, PhotoStatus::Rejected);
        rejected.reject_reason = Some("blurry".to_string());
        let service = service(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[photo_row(2, PhotoStatus::Pending)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[rejected]]),
            Arc::new(RecordingStorage::default()),
        );

        let photo = service
            .reject(2, Some("  blurry ".to_string()))
            .await
            .unwrap();
        assert_eq!(photo.status, PhotoStatus::Rejected);
        assert_eq!(photo.reject_reason.as_deref(), Some("blurry"));
    }
}
