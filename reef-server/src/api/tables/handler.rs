//! Dining Table API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub restaurant_id: Option<i64>,
    /// Minimum capacity filter; only AVAILABLE tables are returned when set
    pub min_capacity: Option<i32>,
}

/// GET /api/tables - 获取桌台列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let tables = match (query.restaurant_id, query.min_capacity) {
        (Some(rid), Some(capacity)) => state.registry.find_available(rid, capacity),
        (Some(rid), None) => state.registry.list_by_restaurant(rid),
        (None, _) => state.registry.list(),
    };
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = state.registry.get(id)?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    if payload.capacity.is_some_and(|c| c < 1) {
        return Err(AppError::validation("Table capacity must be at least 1"));
    }
    let table = state.registry.create(payload);
    Ok(Json(table))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    let table = state.registry.update(id, payload)?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.registry.delete(id)))
}

/// POST /api/tables/:id/clean - 桌台进入清洁状态
pub async fn mark_cleaning(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = state.registry.mark_cleaning(id)?;
    Ok(Json(table))
}

/// POST /api/tables/:id/available - 桌台恢复可用
pub async fn mark_available(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let table = state.registry.free(id)?;
    Ok(Json(table))
}

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub reservation_id: i64,
}

/// POST /api/tables/:id/assign - 手动绑定预订
///
/// 与预订侧的 assign_table 等价，冲突时返回占用者
pub async fn assign_reservation(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<Json<shared::models::Reservation>> {
    let reservation = state.engine.assign_table(payload.reservation_id, id)?;
    Ok(Json(reservation))
}
