//! Photo repository.
//!
//! Reads go through raw SQL so the selected column set can follow the
//! [`SchemaCapabilities`] detected at startup. Columns the schema lacks are
//! selected as `NULL` and decode as `None`. Updates skip those columns and
//! re-read through the same select list.

use std::sync::Arc;

use chrono::Utc;
use pic4pick_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    NotSet, QueryFilter, Set, Statement, Value,
};

use crate::entities::Photo;
use crate::entities::photo::{self, PhotoStatus};
use crate::schema::{CAMERA_COLUMNS, SchemaCapabilities};

/// Columns every schema version carries.
const BASE_COLUMNS: [&str; 20] = [
    "id",
    "title",
    "category",
    "tags",
    "rating",
    "location_province",
    "location_city",
    "location_country",
    "oss_key",
    "oss_url",
    "thumbnail_url",
    "preview_url",
    "status",
    "reject_reason",
    "likes",
    "views",
    "uploader_id",
    "shot_date",
    "created_at",
    "updated_at",
];

const VISIBLE_PREDICATE: &str = "(hidden IS NULL OR hidden = 0)";

/// Category names that select an ordering instead of filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryView {
    /// "最新": newest first.
    Latest,
    /// "随览": random order on every request.
    Browse,
    /// "附近": closest to the caller first.
    Nearby,
    /// "远方": farthest from the caller first.
    Far,
    /// Any other name filters on `photos.category`.
    Named(String),
}

impl CategoryView {
    /// Classify a requested category name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "最新" => Self::Latest,
            "随览" => Self::Browse,
            "附近" => Self::Nearby,
            "远方" => Self::Far,
            other => Self::Named(other.to_string()),
        }
    }

    const fn is_geo(&self) -> bool {
        matches!(self, Self::Nearby | Self::Far)
    }
}

/// Listing filter. `status` is trusted as given; callers pin it for
/// anonymous visitors.
#[derive(Debug, Clone, Default)]
pub struct PhotoFilter {
    pub status: Option<PhotoStatus>,
    pub category: Option<String>,
    pub keyword: Option<String>,
    pub show_hidden: bool,
    pub user_lat: Option<f64>,
    pub user_lng: Option<f64>,
}

/// A page of photos plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct PhotoPage {
    pub items: Vec<photo::Model>,
    pub total: u64,
}

/// SQL fragments for one listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSql {
    /// Predicate shared by the page query and the count query.
    pub where_clause: String,
    pub where_values: Vec<Value>,
    pub order_clause: String,
    pub order_values: Vec<Value>,
}

impl ListingSql {
    /// Build the predicate and ordering for `filter`.
    #[must_use]
    pub fn build(filter: &PhotoFilter, caps: SchemaCapabilities) -> Self {
        let mut clauses: Vec<String> = Vec::new();
        let mut where_values: Vec<Value> = Vec::new();

        if let Some(status) = filter.status {
            clauses.push("status = ?".to_string());
            where_values.push(status.as_str().into());
        }

        let view = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(CategoryView::from_name);

        if let Some(CategoryView::Named(name)) = &view {
            clauses.push("category = ?".to_string());
            where_values.push(name.clone().into());
        }

        if let Some(keyword) = filter
            .keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        {
            let pattern = like_pattern(keyword);
            clauses.push(
                "(LOWER(title) LIKE ? OR LOWER(location_city) LIKE ? OR LOWER(location_country) LIKE ?)"
                    .to_string(),
            );
            for _ in 0..3 {
                where_values.push(pattern.clone().into());
            }
        }

        if !filter.show_hidden && caps.has_hidden {
            clauses.push(VISIBLE_PREDICATE.to_string());
        }

        let geo_view = view.as_ref().filter(|v| v.is_geo() && caps.has_geo);
        if geo_view.is_some() {
            clauses.push("lat IS NOT NULL AND lng IS NOT NULL".to_string());
        }

        let where_clause = if clauses.is_empty() {
            "1 = 1".to_string()
        } else {
            clauses.join(" AND ")
        };

        let (order_clause, order_values) = match (view.as_ref(), filter.user_lat, filter.user_lng)
        {
            (Some(CategoryView::Browse), _, _) => ("RAND()".to_string(), Vec::new()),
            (Some(CategoryView::Nearby), Some(lat), Some(lng)) if caps.has_geo => {
                (format!("{DISTANCE_EXPR} ASC, id DESC"), distance_values(lat, lng))
            }
            (Some(CategoryView::Far), Some(lat), Some(lng)) if caps.has_geo => {
                (format!("{DISTANCE_EXPR} DESC, id DESC"), distance_values(lat, lng))
            }
            _ => (DEFAULT_ORDER.to_string(), Vec::new()),
        };

        Self {
            where_clause,
            where_values,
            order_clause,
            order_values,
        }
    }
}

/// Squared planar distance from the bound point.
const DISTANCE_EXPR: &str = "((lat - ?) * (lat - ?) + (lng - ?) * (lng - ?))";

const DEFAULT_ORDER: &str = "COALESCE(shot_date, created_at) DESC, id DESC";

fn distance_values(lat: f64, lng: f64) -> Vec<Value> {
    vec![lat.into(), lat.into(), lng.into(), lng.into()]
}

/// Lower-cased `%keyword%` with LIKE wildcards escaped.
fn like_pattern(keyword: &str) -> String {
    let escaped = keyword
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Select list for `photos` under the given capabilities.
#[must_use]
pub fn select_columns(caps: SchemaCapabilities) -> String {
    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(ToString::to_string).collect();

    let optional = |present: bool, name: &str| {
        if present {
            name.to_string()
        } else {
            format!("NULL AS {name}")
        }
    };

    columns.push(optional(caps.has_geo, "lat"));
    columns.push(optional(caps.has_geo, "lng"));
    for name in CAMERA_COLUMNS {
        columns.push(optional(caps.has_camera_metadata, name));
    }
    columns.push(optional(caps.has_hidden, "hidden"));

    columns.join(", ")
}

/// Raw row for location aggregation.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct LocationRow {
    pub location_province: Option<String>,
    pub location_city: Option<String>,
    /// First of thumbnail, preview and original URL that is set.
    pub thumbnail: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    total: i64,
}

/// Photo repository for database operations.
#[derive(Clone)]
pub struct PhotoRepository {
    db: Arc<DatabaseConnection>,
    caps: SchemaCapabilities,
}

impl PhotoRepository {
    /// Create a new photo repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, caps: SchemaCapabilities) -> Self {
        Self { db, caps }
    }

    /// Fetch one page of photos matching `filter`.
    pub async fn list(&self, filter: &PhotoFilter, page: u64, page_size: u64) -> AppResult<PhotoPage> {
        let sql = ListingSql::build(filter, self.caps);
        let offset = page.saturating_sub(1).saturating_mul(page_size);

        let page_sql = format!(
            "SELECT {} FROM photos WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
            select_columns(self.caps),
            sql.where_clause,
            sql.order_clause
        );
        let mut page_values = sql.where_values.clone();
        page_values.extend(sql.order_values.iter().cloned());
        page_values.push(page_size.into());
        page_values.push(offset.into());

        let items = photo::Model::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            page_sql,
            page_values,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        let count_sql = format!(
            "SELECT COUNT(*) AS total FROM photos WHERE {}",
            sql.where_clause
        );
        let total = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            count_sql,
            sql.where_values,
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .map_or(0, |row| u64::try_from(row.total).unwrap_or(0));

        Ok(PhotoPage { items, total })
    }

    /// Find a photo by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<photo::Model>> {
        let sql = format!(
            "SELECT {} FROM photos WHERE id = ?",
            select_columns(self.caps)
        );
        photo::Model::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            sql,
            [id.into()],
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a photo by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i64) -> AppResult<photo::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Photo: {id}")))
    }

    /// Publicly visible photos with a province or city, most recently
    /// updated first.
    pub async fn find_location_rows(&self) -> AppResult<Vec<LocationRow>> {
        let geo = if self.caps.has_geo {
            "lat, lng"
        } else {
            "NULL AS lat, NULL AS lng"
        };
        let hidden = if self.caps.has_hidden {
            format!(" AND {VISIBLE_PREDICATE}")
        } else {
            String::new()
        };
        let sql = format!(
            "SELECT location_province, location_city, \
             COALESCE(thumbnail_url, preview_url, oss_url) AS thumbnail, {geo} \
             FROM photos \
             WHERE status = ?{hidden} \
             AND ((location_province IS NOT NULL AND location_province <> '') \
             OR (location_city IS NOT NULL AND location_city <> '')) \
             ORDER BY updated_at DESC"
        );

        LocationRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::MySql,
            sql,
            [PhotoStatus::Approved.as_str().into()],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a photo and read it back.
    pub async fn create(&self, mut model: photo::ActiveModel) -> AppResult<photo::Model> {
        self.drop_missing_columns(&mut model);

        let result = Photo::insert(model)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.get_by_id(result.last_insert_id).await
    }

    /// Write the `Set` fields of `model` to photo `id`, then read it back.
    pub async fn update(&self, id: i64, mut model: photo::ActiveModel) -> AppResult<photo::Model> {
        self.drop_missing_columns(&mut model);
        model.id = NotSet;

        Photo::update_many()
            .set(model)
            .filter(photo::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.get_by_id(id).await
    }

    /// Unset fields whose columns the schema lacks.
    fn drop_missing_columns(&self, model: &mut photo::ActiveModel) {
        if !self.caps.has_hidden {
            model.hidden = NotSet;
        }
        if !self.caps.has_geo {
            model.lat = NotSet;
            model.lng = NotSet;
        }
        if !self.caps.has_camera_metadata {
            model.focal_length = NotSet;
            model.aperture = NotSet;
            model.shutter_speed = NotSet;
            model.iso = NotSet;
            model.camera = NotSet;
            model.lens = NotSet;
        }
    }

    /// Set the review status. The reason is only kept for rejections.
    pub async fn set_status(
        &self,
        id: i64,
        status: PhotoStatus,
        reject_reason: Option<String>,
    ) -> AppResult<photo::Model> {
        self.get_by_id(id).await?;

        let reject_reason = match status {
            PhotoStatus::Rejected => reject_reason,
            PhotoStatus::Pending | PhotoStatus::Approved => None,
        };
        self.update(
            id,
            photo::ActiveModel {
                status: Set(status),
                reject_reason: Set(reject_reason),
                updated_at: Set(Utc::now()),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a photo. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = Photo::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Increment the like counter.
    pub async fn increment_likes(&self, id: i64) -> AppResult<i32> {
        self.bump_counter(id, photo::Column::Likes, Expr::col(photo::Column::Likes).add(1))
            .await
            .map(|p| p.likes)
    }

    /// Decrement the like counter, never below zero.
    pub async fn decrement_likes(&self, id: i64) -> AppResult<i32> {
        self.bump_counter(
            id,
            photo::Column::Likes,
            Expr::cust("GREATEST(likes - 1, 0)"),
        )
        .await
        .map(|p| p.likes)
    }

    /// Increment the view counter.
    pub async fn increment_views(&self, id: i64) -> AppResult<i32> {
        self.bump_counter(id, photo::Column::Views, Expr::col(photo::Column::Views).add(1))
            .await
            .map(|p| p.views)
    }

    async fn bump_counter(
        &self,
        id: i64,
        column: photo::Column,
        value: sea_orm::sea_query::SimpleExpr,
    ) -> AppResult<photo::Model> {
        Photo::update_many()
            .col_expr(column, value)
            .filter(photo::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.get_by_id(id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_photo(id: i64, status: PhotoStatus) -> photo::Model {
        photo::Model {
            id,
            title: format!("Photo {id}"),
            category: Some("风光".to_string()),
            tags: Some("sea,sunset".to_string()),
            rating: Some(8),
            location_province: Some("浙江省".to_string()),
            location_city: Some("杭州市".to_string()),
            location_country: Some("中国".to_string()),
            lat: Some(30.25),
            lng: Some(120.17),
            focal_length: Some("35mm".to_string()),
            aperture: Some("f/2.8".to_string()),
            shutter_speed: Some("1/250".to_string()),
            iso: Some("100".to_string()),
            camera: None,
            lens: None,
            oss_key: format!("photos/original/2024/05/{id}.jpg"),
            oss_url: Some(format!("https://cdn.example.com/photos/original/2024/05/{id}.jpg")),
            thumbnail_url: None,
            preview_url: None,
            status,
            reject_reason: None,
            hidden: Some(false),
            likes: 0,
            views: 0,
            uploader_id: Some(1),
            shot_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_listing_pins_status_and_hides_hidden() {
        let filter = PhotoFilter {
            status: Some(PhotoStatus::Approved),
            ..Default::default()
        };
        let sql = ListingSql::build(&filter, SchemaCapabilities::full());

        assert_eq!(
            sql.where_clause,
            "status = ? AND (hidden IS NULL OR hidden = 0)"
        );
        assert_eq!(sql.where_values, vec![Value::from("approved")]);
        assert_eq!(sql.order_clause, DEFAULT_ORDER);
    }

    #[test]
    fn test_sentinel_categories_do_not_filter() {
        for name in ["最新", "随览", "附近", "远方"] {
            let filter = PhotoFilter {
                category: Some(name.to_string()),
                show_hidden: true,
                ..Default::default()
            };
            let sql = ListingSql::build(&filter, SchemaCapabilities::full());
            assert!(!sql.where_clause.contains("category"), "{name}");
        }

        let filter = PhotoFilter {
            category: Some("人像".to_string()),
            show_hidden: true,
            ..Default::default()
        };
        let sql = ListingSql::build(&filter, SchemaCapabilities::full());
        assert_eq!(sql.where_clause, "category = ?");
        assert_eq!(sql.where_values, vec![Value::from("人像".to_string())]);
    }

    #[test]
    fn test_browse_orders_randomly() {
        let filter = PhotoFilter {
            category: Some("随览".to_string()),
            ..Default::default()
        };
        let sql = ListingSql::build(&filter, SchemaCapabilities::full());
        assert_eq!(sql.order_clause, "RAND()");
    }

    #[test]
    fn test_nearby_and_far_order_by_distance() {
        let mut filter = PhotoFilter {
            category: Some("附近".to_string()),
            show_hidden: true,
            user_lat: Some(30.0),
            user_lng: Some(120.0),
            ..Default::default()
        };
        let nearby = ListingSql::build(&filter, SchemaCapabilities::full());
        assert_eq!(nearby.where_clause, "lat IS NOT NULL AND lng IS NOT NULL");
        assert!(nearby.order_clause.starts_with(DISTANCE_EXPR));
        assert!(nearby.order_clause.contains("ASC"));
        assert_eq!(
            nearby.order_values,
            vec![
                Value::from(30.0),
                Value::from(30.0),
                Value::from(120.0),
                Value::from(120.0)
            ]
        );

        filter.category = Some("远方".to_string());
        let far = ListingSql::build(&filter, SchemaCapabilities::full());
        assert!(far.order_clause.starts_with(&format!("{DISTANCE_EXPR} DESC")));
    }

    #[test]
    fn test_nearby_without_coordinates_falls_back_to_default_order() {
        let filter = PhotoFilter {
            category: Some("附近".to_string()),
            user_lat: Some(30.0),
            ..Default::default()
        };
        let sql = ListingSql::build(&filter, SchemaCapabilities::full());
        assert!(sql.where_clause.contains("lat IS NOT NULL"));
        assert_eq!(sql.order_clause, DEFAULT_ORDER);
        assert!(sql.order_values.is_empty());
    }

    #[test]
    fn test_keyword_matches_three_columns_with_escaped_pattern() {
        let filter = PhotoFilter {
            keyword: Some(" West_Lake ".to_string()),
            show_hidden: true,
            ..Default::default()
        };
        let sql = ListingSql::build(&filter, SchemaCapabilities::full());
        assert!(sql.where_clause.contains("LOWER(title) LIKE ?"));
        assert!(sql.where_clause.contains("LOWER(location_city) LIKE ?"));
        assert!(sql.where_clause.contains("LOWER(location_country) LIKE ?"));
        assert_eq!(sql.where_values.len(), 3);
        assert_eq!(sql.where_values[0], Value::from("%west\\_lake%".to_string()));
    }

    #[test]
    fn test_degraded_schema_selects_null_placeholders() {
        let caps = SchemaCapabilities {
            has_hidden: false,
            has_camera_metadata: false,
            has_geo: false,
            ..SchemaCapabilities::full()
        };
        let columns = select_columns(caps);
        assert!(columns.contains("NULL AS hidden"));
        assert!(columns.contains("NULL AS lens"));
        assert!(columns.contains("NULL AS lat"));

        let filter = PhotoFilter {
            category: Some("附近".to_string()),
            user_lat: Some(1.0),
            user_lng: Some(2.0),
            ..Default::default()
        };
        let sql = ListingSql::build(&filter, caps);
        assert_eq!(sql.where_clause, "1 = 1");
        assert_eq!(sql.order_clause, DEFAULT_ORDER);
    }

    #[tokio::test]
    async fn test_list_returns_items_and_total() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[
                    create_test_photo(1, PhotoStatus::Approved),
                    create_test_photo(2, PhotoStatus::Approved),
                ]])
                .append_query_results([[maplit::btreemap! {
                    "total" => Value::BigInt(Some(7)),
                }]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db, SchemaCapabilities::full());
        let filter = PhotoFilter {
            status: Some(PhotoStatus::Approved),
            ..Default::default()
        };
        let page = repo.list(&filter, 2, 2).await.unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 7);
    }

    #[tokio::test]
    async fn test_set_status_approve_clears_reason() {
        let mut rejected = create_test_photo(5, PhotoStatus::Rejected);
        rejected.reject_reason = Some("blurry".to_string());
        let mut approved = rejected.clone();
        approved.status = PhotoStatus::Approved;
        approved.reject_reason = None;

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[rejected]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[approved]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db, SchemaCapabilities::full());
        let updated = repo
            .set_status(5, PhotoStatus::Approved, Some("ignored".to_string()))
            .await
            .unwrap();

        assert_eq!(updated.status, PhotoStatus::Approved);
        assert!(updated.reject_reason.is_none());
    }

    #[tokio::test]
    async fn test_writes_on_degraded_schema_skip_missing_columns() {
        let caps = SchemaCapabilities {
            has_hidden: false,
            has_camera_metadata: false,
            has_geo: false,
            ..SchemaCapabilities::full()
        };
        let photo = create_test_photo(1, PhotoStatus::Pending);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([[photo.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[photo.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[photo]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db.clone(), caps);
        repo.set_status(1, PhotoStatus::Approved, None).await.unwrap();
        repo.update(
            1,
            photo::ActiveModel {
                title: Set("湖边".to_string()),
                hidden: Set(Some(true)),
                lat: Set(Some(30.0)),
                lens: Set(Some("50mm".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        drop(repo);

        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        let statements = format!("{log:?}");
        assert_eq!(statements.matches("UPDATE `photos`").count(), 2);
        assert!(!statements.contains("`hidden`"));
        assert!(!statements.contains("`lat`"));
        assert!(!statements.contains("`lens`"));
        assert_eq!(statements.matches("NULL AS hidden").count(), 3);
    }

    #[tokio::test]
    async fn test_set_status_missing_photo_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_query_results([Vec::<photo::Model>::new()])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db, SchemaCapabilities::full());
        let result = repo.set_status(9, PhotoStatus::Approved, None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_decrement_likes_returns_fresh_count() {
        let photo = create_test_photo(3, PhotoStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[photo]])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db, SchemaCapabilities::full());
        assert_eq!(repo.decrement_likes(3).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_reports_missing_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::MySql)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = PhotoRepository::new(db, SchemaCapabilities::full());
        assert!(!repo.delete(42).await.unwrap());
    }
}
