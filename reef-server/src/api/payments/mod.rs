//! Payment API 模块

mod handler;

use axum::{routing::get, routing::post, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/cash", post(handler::pay_cash))
        .route("/card", post(handler::pay_card))
        .route("/paypal", post(handler::pay_paypal))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/refund", post(handler::refund))
        .route("/reservation/{reservation_id}", get(handler::get_by_reservation))
}
