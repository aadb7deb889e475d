//! Reservation API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use shared::models::{Reservation, ReservationCreate, ReservationStatus};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub restaurant_id: Option<i64>,
    pub customer_id: Option<i64>,
    /// Currently seated only (CHECKED_IN / TIMEOUT_WARNING)
    #[serde(default)]
    pub active: bool,
}

/// GET /api/reservations - 预订列表（支持状态/餐厅/顾客过滤）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    if query.active {
        return Ok(Json(state.engine.list_active()));
    }
    if let Some(status) = query.status {
        let status = ReservationStatus::parse(&status).ok_or_else(|| {
            AppError::invalid_request(format!("Invalid reservation status: {}", status))
        })?;
        return Ok(Json(state.engine.list_by_status(status)));
    }
    if let Some(rid) = query.restaurant_id {
        return Ok(Json(state.engine.list_by_restaurant(rid)));
    }
    if let Some(cid) = query.customer_id {
        return Ok(Json(state.engine.list_by_customer(cid)));
    }
    Ok(Json(state.engine.list()))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.engine.get(id)?))
}

/// POST /api/reservations - 创建预订（自动分桌 + 签发二维码令牌）
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.engine.create(payload, Utc::now())?;
    Ok(Json(reservation))
}

#[derive(Debug, Deserialize)]
pub struct WalkInRequest {
    pub table_id: i64,
    pub party_size: i32,
}

/// POST /api/reservations/walkin - 无预订入座
pub async fn create_walk_in(
    State(state): State<ServerState>,
    Json(payload): Json<WalkInRequest>,
) -> AppResult<Json<Reservation>> {
    let reservation = state
        .engine
        .create_walk_in(payload.table_id, payload.party_size, Utc::now())?;
    Ok(Json(reservation))
}

/// POST /api/reservations/:id/cancel - 取消预订（含迟退费）
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.engine.cancel(id, Utc::now())?))
}

/// POST /api/reservations/:id/checkin - 到店入座
pub async fn check_in(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.engine.check_in(id, Utc::now())?))
}

/// POST /api/reservations/:id/complete - 完成用餐
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.engine.complete(id)?))
}

#[derive(Debug, Deserialize)]
pub struct AssignTableRequest {
    pub table_id: i64,
}

/// PUT /api/reservations/:id/table - 手动换桌/分桌
pub async fn assign_table(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignTableRequest>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(state.engine.assign_table(id, payload.table_id)?))
}

/// DELETE /api/reservations/:id - 删除预订（管理操作）
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.engine.delete(id)?;
    Ok(Json(true))
}
