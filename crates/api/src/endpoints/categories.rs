//! Category endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, patch, post},
};
use pic4pick_common::AppResult;
use pic4pick_core::{CreateCategoryInput, UpdateCategoryInput};
use pic4pick_db::entities::{category, deleted_category_log};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    extractors::{AdminUser, JsonBody, QueryParams},
    middleware::AppState,
    response::success,
};

/// Reorder request: ids in their new display order.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<i64>,
}

/// Archive listing query.
#[derive(Debug, Deserialize)]
pub struct ArchivedQuery {
    #[serde(default = "default_archive_limit")]
    pub limit: u64,
}

const fn default_archive_limit() -> u64 {
    50
}

async fn list_active(State(state): State<AppState>) -> AppResult<Json<Vec<category::Model>>> {
    Ok(Json(state.category_service.list_active().await?))
}

async fn list_deleted(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<Vec<category::Model>>> {
    Ok(Json(state.category_service.list_deleted().await?))
}

async fn list_archived(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    QueryParams(query): QueryParams<ArchivedQuery>,
) -> AppResult<Json<Vec<deleted_category_log::Model>>> {
    Ok(Json(state.category_service.list_archived(query.limit).await?))
}

async fn create(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(input): JsonBody<CreateCategoryInput>,
) -> AppResult<Json<category::Model>> {
    Ok(Json(state.category_service.create(input).await?))
}

async fn update(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<UpdateCategoryInput>,
) -> AppResult<Json<category::Model>> {
    Ok(Json(state.category_service.update(id, input).await?))
}

/// Soft delete.
async fn soft_delete(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<category::Model>> {
    Ok(Json(state.category_service.soft_delete(id).await?))
}

async fn restore(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<category::Model>> {
    Ok(Json(state.category_service.restore(id).await?))
}

async fn delete_permanently(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<deleted_category_log::Model>> {
    Ok(Json(state.category_service.delete_permanently(id).await?))
}

async fn reorder(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(req): JsonBody<ReorderRequest>,
) -> AppResult<Json<Value>> {
    state.category_service.reorder(&req.ids).await?;
    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_active).post(create))
        .route("/deleted", get(list_deleted))
        .route("/archived", get(list_archived))
        .route("/reorder", post(reorder))
        .route("/{id}", patch(update).delete(soft_delete))
        .route("/{id}/restore", post(restore))
        .route("/{id}/permanent", delete(delete_permanently))
}
