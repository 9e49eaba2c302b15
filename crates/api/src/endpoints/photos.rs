//! Photo endpoints.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    routing::{get, post},
};
use pic4pick_common::{AppError, AppResult, normalize_extension};
use pic4pick_core::{
    CreateCommentInput, CreatePhotoInput, ListPhotosQuery, LocationNode, PhotoListing,
    StoredPhoto, UpdatePhotoInput,
};
use pic4pick_db::entities::{photo, photo_comment};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{
    extractors::{AdminUser, AuthUser, ClientIp, JsonBody, MaybeAuthUser, QueryParams},
    middleware::AppState,
};

// ==================== Request/Response Types ====================

/// Reject request.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Photo deletion result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePhotoResponse {
    pub success: bool,
    /// Objects that could not be removed from storage.
    pub orphaned_keys: Vec<String>,
}

// ==================== Listing & Reads ====================

async fn list_photos(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    QueryParams(query): QueryParams<ListPhotosQuery>,
) -> AppResult<Json<PhotoListing>> {
    Ok(Json(state.photo_service.list(&query, viewer.identity()).await?))
}

async fn get_photo(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<photo::Model>> {
    Ok(Json(state.photo_service.get(id, viewer.identity()).await?))
}

async fn locations(State(state): State<AppState>) -> AppResult<Json<Vec<LocationNode>>> {
    Ok(Json(state.location_service.tree().await?))
}

// ==================== Upload & Writes ====================

/// Accept a multipart `file` field and store it with its variants.
async fn upload_oss(
    State(state): State<AppState>,
    AuthUser(uploader): AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<StoredPhoto>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let extension = field
            .file_name()
            .map_or_else(|| "jpg".to_string(), normalize_extension);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        let stored = state.photo_service.upload(data.to_vec(), &extension).await?;
        tracing::info!(
            uploader = %uploader.username,
            key = %stored.oss_key,
            has_variants = stored.thumbnail_url.is_some(),
            "Photo uploaded"
        );
        return Ok(Json(stored));
    }

    Err(AppError::BadRequest("Missing file field".to_string()))
}

async fn create_photo(
    State(state): State<AppState>,
    AuthUser(uploader): AuthUser,
    JsonBody(input): JsonBody<CreatePhotoInput>,
) -> AppResult<Json<photo::Model>> {
    Ok(Json(state.photo_service.create(input, &uploader).await?))
}

async fn update_photo(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<UpdatePhotoInput>,
) -> AppResult<Json<photo::Model>> {
    Ok(Json(state.photo_service.update(id, input).await?))
}

async fn delete_photo(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<DeletePhotoResponse>> {
    let cleanup = state.photo_service.delete(id).await?;
    Ok(Json(DeletePhotoResponse {
        success: true,
        orphaned_keys: cleanup.failed,
    }))
}

// ==================== Workflow & Counters ====================

async fn approve(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<photo::Model>> {
    Ok(Json(state.photo_service.approve(id).await?))
}

async fn reject(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    body: Bytes,
) -> AppResult<Json<photo::Model>> {
    // The body is optional
    let req: RejectRequest = if body.is_empty() {
        RejectRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?
    };
    Ok(Json(state.photo_service.reject(id, req.reason).await?))
}

async fn like(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    viewer: MaybeAuthUser,
) -> AppResult<Json<Value>> {
    let likes = state.photo_service.like(id, viewer.identity()).await?;
    Ok(Json(json!({ "likes": likes })))
}

async fn unlike(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    viewer: MaybeAuthUser,
) -> AppResult<Json<Value>> {
    let likes = state.photo_service.unlike(id, viewer.identity()).await?;
    Ok(Json(json!({ "likes": likes })))
}

async fn view(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    viewer: MaybeAuthUser,
) -> AppResult<Json<Value>> {
    let views = state.photo_service.view(id, viewer.identity()).await?;
    Ok(Json(json!({ "views": views })))
}

// ==================== Comments ====================

async fn list_comments(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<photo_comment::Model>>> {
    Ok(Json(state.comment_service.list(id, viewer.identity()).await?))
}

async fn create_comment(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    ClientIp(ip): ClientIp,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<CreateCommentInput>,
) -> AppResult<Json<photo_comment::Model>> {
    Ok(Json(
        state
            .comment_service
            .create(id, input, viewer.identity(), ip)
            .await?,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_photos).post(create_photo))
        .route("/locations", get(locations))
        .route("/upload-oss", post(upload_oss))
        .route(
            "/{id}",
            get(get_photo).patch(update_photo).delete(delete_photo),
        )
        .route("/{id}/approve", post(approve))
        .route("/{id}/reject", post(reject))
        .route("/{id}/like", post(like))
        .route("/{id}/unlike", post(unlike))
        .route("/{id}/view", post(view))
        .route("/{id}/comments", get(list_comments).post(create_comment))
}
