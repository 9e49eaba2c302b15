//! HTTP API layer for pic4pick.
//!
//! - **Endpoints**: JSON routes under `/api`
//! - **Extractors**: caller identity, admin gate, client address
//! - **Middleware**: bearer token decoding
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::{Router, extract::DefaultBodyLimit};

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};

/// The API mounted under `/api`, with token decoding and the upload body
/// limit applied.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .nest("/api", router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}
