//! Waiter API 模块 (前厅聚合视图与操作)

mod handler;

use axum::{routing::get, routing::post, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/waiter", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/state", get(handler::state))
        .route("/orders", post(handler::create_order))
        .route("/orders/{id}/served", post(handler::mark_order_served))
        .route("/tables/{id}/clear", post(handler::clear_table))
        .route("/tables/{id}/finish", post(handler::finish_table))
}
