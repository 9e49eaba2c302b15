//! Authentication endpoints.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use pic4pick_common::AppResult;
use pic4pick_core::{AuthResponse, LoginInput, RegisterInput, UserView};

use crate::{
    extractors::{AuthUser, JsonBody},
    middleware::AppState,
};

/// Create a viewer account.
async fn register(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(state.auth_service.register(input).await?))
}

/// Create the first admin. Refused once any admin exists.
async fn init_admin(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<RegisterInput>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(state.auth_service.init_admin(input).await?))
}

async fn login(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(state.auth_service.login(input).await?))
}

async fn me(State(state): State<AppState>, AuthUser(identity): AuthUser) -> AppResult<Json<UserView>> {
    Ok(Json(state.auth_service.me(&identity).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/init-admin", post(init_admin))
        .route("/login", post(login))
        .route("/me", get(me))
}
