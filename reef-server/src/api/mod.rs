//! HTTP API - 路由和处理器
//!
//! 每个资源一个子模块，遵循 `api/<resource>/{mod,handler}.rs` 结构。

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub mod checkin;
pub mod health;
pub mod payments;
pub mod reservations;
pub mod tables;
pub mod waiter;

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(checkin::router())
        .merge(payments::router())
        .merge(waiter::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
