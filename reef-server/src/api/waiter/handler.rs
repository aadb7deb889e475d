//! Waiter API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use shared::models::KitchenOrder;

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::waiter::{CreateKitchenOrder, WaiterState};

#[derive(Debug, Deserialize)]
pub struct StateQuery {
    pub restaurant_id: Option<i64>,
}

/// GET /api/waiter/state - 前厅实时视图（桌台 + 订单）
pub async fn state(
    State(state): State<ServerState>,
    Query(query): Query<StateQuery>,
) -> AppResult<Json<WaiterState>> {
    Ok(Json(state.waiter.state(query.restaurant_id).await))
}

/// POST /api/waiter/orders - 下单（转发厨房服务）
pub async fn create_order(
    State(state): State<ServerState>,
    Json(payload): Json<CreateKitchenOrder>,
) -> AppResult<Json<KitchenOrder>> {
    let order = state.waiter.create_order(payload).await?;
    Ok(Json(order))
}

/// POST /api/waiter/orders/:id/served - 标记已上菜
pub async fn mark_order_served(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.waiter.mark_order_served(id).await?;
    Ok(Json(true))
}

/// POST /api/waiter/tables/:id/clear - 收台（进入清洁）
pub async fn clear_table(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.waiter.clear_table(id)?;
    Ok(Json(true))
}

/// POST /api/waiter/tables/:id/finish - 结台（完成预订并释放桌台）
///
/// 仍有待上菜订单时返回 409
pub async fn finish_table(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    state.waiter.finish_table(id).await?;
    Ok(Json(true))
}
