//! API endpoints.

mod auth;
mod categories;
mod comments;
mod config;
mod health;
mod photos;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/health", health::router())
        .nest("/auth", auth::router())
        .nest("/photos", photos::router())
        .nest("/comments", comments::router())
        .nest("/categories", categories::router())
        .nest("/config", config::router())
}
