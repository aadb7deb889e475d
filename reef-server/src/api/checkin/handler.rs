//! Check-in API Handlers
//!
//! Three redemption surfaces over the same stateless token: a JSON
//! validation endpoint, a JSON redemption endpoint, and a browser-facing
//! GET that answers with a small HTML confirmation page (the QR code
//! encodes this URL).

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::models::Reservation;

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<i64>,
}

/// POST /api/checkin/validate - 校验令牌（不入座）
///
/// Validation failures are part of the response shape, not HTTP errors:
/// a kiosk polls this endpoint and renders the reason directly.
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<TokenRequest>,
) -> Json<ValidationResponse> {
    match state.tokens.validate(&payload.token) {
        Ok(claims) => Json(ValidationResponse {
            valid: true,
            message: "Valid".to_string(),
            reservation_id: Some(claims.reservation_id),
            guest_id: claims.guest_id,
        }),
        Err(err) => Json(ValidationResponse {
            valid: false,
            message: err.to_string(),
            reservation_id: None,
            guest_id: None,
        }),
    }
}

/// POST /api/checkin - 扫码入座
pub async fn redeem(
    State(state): State<ServerState>,
    Json(payload): Json<TokenRequest>,
) -> AppResult<Json<Reservation>> {
    let claims = state.tokens.validate(&payload.token)?;
    let reservation = match claims.guest_id {
        Some(guest_id) => state
            .engine
            .check_in_guest(claims.reservation_id, guest_id, Utc::now())?,
        None => state.engine.check_in(claims.reservation_id, Utc::now())?,
    };
    Ok(Json(reservation))
}

/// GET /api/checkin?token=... - 浏览器扫码入座，返回 HTML 确认页
pub async fn redeem_in_browser(
    State(state): State<ServerState>,
    Query(payload): Query<TokenRequest>,
) -> Html<String> {
    let claims = match state.tokens.validate(&payload.token) {
        Ok(claims) => claims,
        Err(err) => return Html(failure_page(&err.to_string())),
    };

    let result = match claims.guest_id {
        Some(guest_id) => state
            .engine
            .check_in_guest(claims.reservation_id, guest_id, Utc::now()),
        None => state.engine.check_in(claims.reservation_id, Utc::now()),
    };

    match result {
        Ok(reservation) => Html(success_page(&reservation)),
        Err(err) => Html(failure_page(&AppError::from(err).message)),
    }
}

/// GET /api/checkin/token/:reservation_id?guest_id= - 签发令牌与跳转地址
///
/// Staff tooling regenerates a QR from here; rendering the image itself
/// is a frontend concern.
pub async fn issue(
    State(state): State<ServerState>,
    Path(reservation_id): Path<i64>,
    Query(query): Query<IssueQuery>,
) -> AppResult<Json<Value>> {
    // Token issuance is pure, but handing out tokens for unknown
    // reservations would only produce dead QR codes
    state.engine.get(reservation_id)?;

    let token = state.tokens.issue(reservation_id, query.guest_id);
    let url = state.tokens.checkin_url(
        &state.config.checkin_base_url,
        reservation_id,
        query.guest_id,
    );
    Ok(Json(json!({ "token": token, "url": url })))
}

#[derive(Debug, Deserialize)]
pub struct IssueQuery {
    pub guest_id: Option<i64>,
}

fn success_page(reservation: &Reservation) -> String {
    let table = reservation
        .table_id
        .map(|t| t.to_string())
        .unwrap_or_else(|| "to be assigned".to_string());
    format!(
        "<html><body style='text-align: center; font-family: Arial;'>\
         <h1 style='color: green;'>Check-in successful</h1>\
         <p><strong>Reservation:</strong> {}</p>\
         <p><strong>Table:</strong> {}</p>\
         <p><strong>Guests:</strong> {}</p>\
         <p style='color: gray; margin-top: 30px;'>You can close this window now.</p>\
         </body></html>",
        reservation.id, table, reservation.party_size
    )
}

fn failure_page(message: &str) -> String {
    format!(
        "<html><body style='text-align: center; font-family: Arial;'>\
         <h1 style='color: red;'>Check-in failed</h1>\
         <p>{}</p>\
         </body></html>",
        message
    )
}
