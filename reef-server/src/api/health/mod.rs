//! Health API 模块

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - 存活探针
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
