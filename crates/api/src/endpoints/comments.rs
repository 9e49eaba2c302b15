//! Comment moderation endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::delete,
};
use pic4pick_common::AppResult;
use serde_json::Value;

use crate::{extractors::AdminUser, middleware::AppState, response::success};

async fn delete_comment(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    state.comment_service.delete(id).await?;
    Ok(success())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_comment))
}
