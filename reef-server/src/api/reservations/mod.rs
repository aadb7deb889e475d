//! Reservation API 模块

mod handler;

use axum::{routing::get, routing::post, routing::put, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/walkin", post(handler::create_walk_in))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/checkin", post(handler::check_in))
        .route("/{id}/complete", post(handler::complete))
        .route("/{id}/table", put(handler::assign_table))
}
