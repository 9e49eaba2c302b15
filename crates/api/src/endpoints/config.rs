//! Site settings endpoints.

use std::collections::{BTreeMap, HashMap};

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use pic4pick_common::AppResult;
use serde_json::Value;

use crate::{
    extractors::{AdminUser, JsonBody},
    middleware::AppState,
};

async fn get_config(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> AppResult<Json<BTreeMap<String, String>>> {
    Ok(Json(state.settings_service.get_all().await?))
}

/// Save settings. Unknown keys are ignored.
async fn save_config(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(body): JsonBody<HashMap<String, Value>>,
) -> AppResult<Json<BTreeMap<String, String>>> {
    let values = body
        .into_iter()
        .map(|(key, value)| (key, setting_text(value)))
        .collect();
    let saved = state.settings_service.save(values).await?;
    tracing::info!(admin = %admin.username, "Site settings updated");
    Ok(Json(saved))
}

/// Settings are stored as text; non-string JSON keeps its literal form.
fn setting_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn get_public_config(
    State(state): State<AppState>,
) -> AppResult<Json<BTreeMap<String, String>>> {
    Ok(Json(state.settings_service.get_public().await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_config).post(save_config))
        .route("/public", get(get_public_config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_setting_text() {
        assert_eq!(setting_text(json!("备案号")), "备案号");
        assert_eq!(setting_text(json!(null)), "");
        assert_eq!(setting_text(json!(42)), "42");
        assert_eq!(setting_text(json!(true)), "true");
    }
}
