//! Check-in API 模块 (二维码扫码入座)

mod handler;

use axum::{routing::get, routing::post, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/checkin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        // GET 供二维码直接在浏览器打开，返回确认页面
        .route("/", get(handler::redeem_in_browser).post(handler::redeem))
        .route("/validate", post(handler::validate))
        .route("/token/{reservation_id}", get(handler::issue))
}
