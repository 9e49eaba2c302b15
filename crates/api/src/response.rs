//! API response helpers.

use axum::Json;
use serde_json::{Value, json};

/// `{"success": true}` body for mutations with nothing else to report.
#[must_use]
pub fn success() -> Json<Value> {
    Json(json!({ "success": true }))
}
