//! API middleware.

#![allow(missing_docs)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use pic4pick_core::{
    AuthService, CategoryService, CommentService, Identity, LocationService, PhotoService,
    SettingsService, TokenError,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub photo_service: PhotoService,
    pub location_service: LocationService,
    pub category_service: CategoryService,
    pub comment_service: CommentService,
    pub settings_service: SettingsService,
}

/// Why the presented bearer token was refused. Stored in request
/// extensions so routes that require a caller can report it.
#[derive(Debug, Clone, Copy)]
pub struct TokenRejection(pub TokenError);

/// Authentication middleware.
///
/// Decodes `Authorization: Bearer <jwt>` into an [`Identity`]. Requests
/// without the header pass through anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").map(str::trim));

    match token {
        None => {}
        Some(Some(token)) if !token.is_empty() => match state.auth_service.verify_token(token) {
            Ok(claims) => {
                req.extensions_mut().insert(Identity::from(claims));
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                req.extensions_mut().insert(TokenRejection(e));
            }
        },
        Some(_) => {
            req.extensions_mut()
                .insert(TokenRejection(TokenError::Invalid));
        }
    }

    next.run(req).await
}
