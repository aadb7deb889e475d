//! Payment API Handlers
//!
//! A successful payment is expected to complete the reservation; that
//! two-step choreography lives here, not inside the recorder. The steps
//! are deliberately not atomic: if completion fails after the money
//! moved, the payment stands and the mismatch is logged for staff.

use axum::{
    extract::{Path, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{Payment, PaymentMethod};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CashPaymentRequest {
    pub reservation_id: i64,
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct ElectronicPaymentRequest {
    pub reservation_id: i64,
    pub amount: Decimal,
    /// Card token or wallet account reference
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct RefundRequest {
    pub amount: Decimal,
}

/// POST /api/payments/cash - 现金支付（服务员收款）
pub async fn pay_cash(
    State(state): State<ServerState>,
    Json(payload): Json<CashPaymentRequest>,
) -> AppResult<Json<Payment>> {
    validate_amount(payload.amount)?;
    let payment = state
        .payments
        .record_cash(payload.reservation_id, payload.amount)?;
    complete_after_payment(&state, payload.reservation_id);
    Ok(Json(payment))
}

/// POST /api/payments/card - 信用卡支付（模拟网关）
pub async fn pay_card(
    State(state): State<ServerState>,
    Json(payload): Json<ElectronicPaymentRequest>,
) -> AppResult<Json<Payment>> {
    pay_electronic(state, payload, PaymentMethod::CreditCard).await
}

/// POST /api/payments/paypal - PayPal 支付（模拟网关）
pub async fn pay_paypal(
    State(state): State<ServerState>,
    Json(payload): Json<ElectronicPaymentRequest>,
) -> AppResult<Json<Payment>> {
    pay_electronic(state, payload, PaymentMethod::Paypal).await
}

async fn pay_electronic(
    state: ServerState,
    payload: ElectronicPaymentRequest,
    method: PaymentMethod,
) -> AppResult<Json<Payment>> {
    validate_amount(payload.amount)?;
    let payment = state
        .payments
        .record_electronic(
            payload.reservation_id,
            payload.amount,
            method,
            &payload.token,
        )
        .await?;
    complete_after_payment(&state, payload.reservation_id);
    Ok(Json(payment))
}

/// Payment succeeded → complete the reservation. Completion failure is
/// tolerated: the visit may already be completed by the waiter, or the
/// reservation may be in an unexpected state; either way the payment is
/// kept and the discrepancy logged.
fn complete_after_payment(state: &ServerState, reservation_id: i64) {
    if let Err(err) = state.engine.complete(reservation_id) {
        tracing::warn!(
            reservation_id,
            error = %err,
            "Payment recorded but reservation completion failed"
        );
    }
}

/// POST /api/payments/:id/refund - 退款
pub async fn refund(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<RefundRequest>,
) -> AppResult<Json<Payment>> {
    validate_amount(payload.amount)?;
    Ok(Json(state.payments.refund(id, payload.amount)?))
}

/// GET /api/payments - 支付列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Payment>>> {
    Ok(Json(state.payments.list()))
}

/// GET /api/payments/:id - 获取单笔支付
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Payment>> {
    Ok(Json(state.payments.get(id)?))
}

/// GET /api/payments/reservation/:reservation_id - 按预订查询支付
pub async fn get_by_reservation(
    State(state): State<ServerState>,
    Path(reservation_id): Path<i64>,
) -> AppResult<Json<Payment>> {
    Ok(Json(state.payments.get_by_reservation(reservation_id)?))
}

fn validate_amount(amount: Decimal) -> AppResult<()> {
    if amount <= Decimal::ZERO {
        return Err(AppError::validation("Payment amount must be positive"));
    }
    Ok(())
}
