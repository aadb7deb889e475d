//! PaymentRecorder - payment attempts against reservations
//!
//! Invariants enforced here:
//! - at most one COMPLETED payment per reservation
//! - a refund requires a prior COMPLETED payment and may not exceed the
//!   original amount

use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Payment, PaymentMethod, PaymentStatus};
use shared::util::{now_millis, snowflake_id};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::gateway::{ChargeRequest, GatewayError, PaymentGateway};
use crate::reservations::{EngineError, ReservationEngine};

/// Payment errors
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment {0} not found")]
    NotFound(i64),

    #[error("no payment found for reservation {0}")]
    NoneForReservation(i64),

    #[error("payment already completed for reservation {0}")]
    AlreadyCompleted(i64),

    #[error("{0} is not an electronic payment method")]
    InvalidMethod(PaymentMethod),

    #[error("payment {id} is {status}, refund requires COMPLETED")]
    NotRefundable { id: i64, status: PaymentStatus },

    #[error("refund {requested} exceeds original payment amount {original}")]
    RefundExceedsAmount {
        requested: Decimal,
        original: Decimal,
    },

    #[error("payment processing timed out")]
    Timeout,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotFound(_) | PaymentError::NoneForReservation(_) => {
                AppError::with_message(ErrorCode::PaymentNotFound, err.to_string())
            }
            PaymentError::AlreadyCompleted(_) => {
                AppError::with_message(ErrorCode::PaymentAlreadyCompleted, err.to_string())
            }
            PaymentError::InvalidMethod(_) => {
                AppError::with_message(ErrorCode::PaymentInvalidMethod, err.to_string())
            }
            PaymentError::NotRefundable { .. } => {
                AppError::with_message(ErrorCode::PaymentNotRefundable, err.to_string())
            }
            PaymentError::RefundExceedsAmount { .. } => {
                AppError::with_message(ErrorCode::PaymentRefundExceedsAmount, err.to_string())
            }
            PaymentError::Timeout => {
                AppError::with_message(ErrorCode::TimeoutError, err.to_string())
            }
            PaymentError::Gateway(e) => {
                AppError::with_message(ErrorCode::PaymentFailed, e.to_string())
            }
            PaymentError::Engine(e) => e.into(),
        }
    }
}

pub type PaymentResult<T> = Result<T, PaymentError>;

/// Payment recording service
pub struct PaymentRecorder {
    payments: DashMap<i64, Payment>,
    engine: Arc<ReservationEngine>,
    gateway: Arc<dyn PaymentGateway>,
    /// Upper bound on one gateway call; the simulated latency must stay
    /// cancellable from the caller's point of view
    gateway_timeout: Duration,
}

impl PaymentRecorder {
    pub fn new(
        engine: Arc<ReservationEngine>,
        gateway: Arc<dyn PaymentGateway>,
        gateway_timeout: Duration,
    ) -> Self {
        Self {
            payments: DashMap::new(),
            engine,
            gateway,
            gateway_timeout,
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Cash payment handled by the waiter: immediately COMPLETED, no
    /// external call
    pub fn record_cash(&self, reservation_id: i64, amount: Decimal) -> PaymentResult<Payment> {
        self.engine.get(reservation_id)?;
        self.ensure_not_paid(reservation_id)?;

        let payment = Payment {
            id: snowflake_id(),
            reservation_id,
            amount,
            method: PaymentMethod::Cash,
            status: PaymentStatus::Completed,
            transaction_id: Some(format!("CASH_{}", now_millis())),
            paid_at: Some(now_millis()),
            refund_amount: None,
            created_at: now_millis(),
            updated_at: now_millis(),
        };

        tracing::info!(
            payment_id = payment.id,
            reservation_id,
            amount = %amount,
            "Cash payment recorded"
        );
        self.payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    /// Electronic payment through the gateway
    ///
    /// The attempt is persisted PENDING before the call; gateway failure
    /// or timeout marks it FAILED and surfaces the error to the caller,
    /// never retried silently.
    pub async fn record_electronic(
        &self,
        reservation_id: i64,
        amount: Decimal,
        method: PaymentMethod,
        token: &str,
    ) -> PaymentResult<Payment> {
        if method == PaymentMethod::Cash {
            return Err(PaymentError::InvalidMethod(method));
        }
        self.engine.get(reservation_id)?;
        self.ensure_not_paid(reservation_id)?;

        let id = snowflake_id();
        let payment = Payment {
            id,
            reservation_id,
            amount,
            method,
            status: PaymentStatus::Pending,
            transaction_id: None,
            paid_at: None,
            refund_amount: None,
            created_at: now_millis(),
            updated_at: now_millis(),
        };
        self.payments.insert(id, payment);

        let charge = self.gateway.charge(ChargeRequest {
            reservation_id,
            amount,
            method,
            token: token.to_string(),
        });

        let outcome = match tokio::time::timeout(self.gateway_timeout, charge).await {
            Ok(result) => result.map_err(PaymentError::from),
            Err(_) => Err(PaymentError::Timeout),
        };

        match outcome {
            Ok(receipt) => {
                let mut entry = self
                    .payments
                    .get_mut(&id)
                    .ok_or(PaymentError::NotFound(id))?;
                entry.status = PaymentStatus::Completed;
                entry.transaction_id = Some(receipt.transaction_id);
                entry.paid_at = Some(now_millis());
                entry.updated_at = now_millis();
                tracing::info!(
                    payment_id = id,
                    reservation_id,
                    method = %method,
                    "Electronic payment completed"
                );
                Ok(entry.clone())
            }
            Err(err) => {
                if let Some(mut entry) = self.payments.get_mut(&id) {
                    entry.status = PaymentStatus::Failed;
                    entry.updated_at = now_millis();
                }
                tracing::warn!(
                    payment_id = id,
                    reservation_id,
                    method = %method,
                    error = %err,
                    "Electronic payment failed"
                );
                Err(err)
            }
        }
    }

    /// Refund a completed payment, up to the original amount
    pub fn refund(&self, payment_id: i64, amount: Decimal) -> PaymentResult<Payment> {
        let mut entry = self
            .payments
            .get_mut(&payment_id)
            .ok_or(PaymentError::NotFound(payment_id))?;

        if entry.status != PaymentStatus::Completed {
            return Err(PaymentError::NotRefundable {
                id: payment_id,
                status: entry.status,
            });
        }
        if amount > entry.amount {
            return Err(PaymentError::RefundExceedsAmount {
                requested: amount,
                original: entry.amount,
            });
        }

        entry.refund_amount = Some(amount);
        entry.status = PaymentStatus::Refunded;
        entry.updated_at = now_millis();

        tracing::info!(payment_id, refund = %amount, "Payment refunded");
        Ok(entry.clone())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, id: i64) -> PaymentResult<Payment> {
        self.payments
            .get(&id)
            .map(|p| p.clone())
            .ok_or(PaymentError::NotFound(id))
    }

    /// Latest payment attempt for a reservation
    pub fn get_by_reservation(&self, reservation_id: i64) -> PaymentResult<Payment> {
        self.payments
            .iter()
            .filter(|p| p.reservation_id == reservation_id)
            .max_by_key(|p| p.created_at)
            .map(|p| p.clone())
            .ok_or(PaymentError::NoneForReservation(reservation_id))
    }

    pub fn list(&self) -> Vec<Payment> {
        let mut all: Vec<Payment> = self.payments.iter().map(|p| p.clone()).collect();
        all.sort_by_key(|p| p.created_at);
        all
    }

    pub fn is_reservation_paid(&self, reservation_id: i64) -> bool {
        self.payments.iter().any(|p| {
            p.reservation_id == reservation_id && p.status == PaymentStatus::Completed
        })
    }

    fn ensure_not_paid(&self, reservation_id: i64) -> PaymentResult<()> {
        if self.is_reservation_paid(reservation_id) {
            return Err(PaymentError::AlreadyCompleted(reservation_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkin::CheckinTokenService;
    use crate::payments::MockPaymentGateway;
    use crate::registry::TableRegistry;
    use chrono::Utc;
    use shared::models::{DiningTableCreate, ReservationCreate};

    fn recorder(paypal_failure_percent: u32) -> (Arc<ReservationEngine>, PaymentRecorder, i64) {
        let registry = Arc::new(TableRegistry::new());
        registry.create(DiningTableCreate {
            restaurant_id: 1,
            table_number: 1,
            capacity: Some(4),
        });
        let engine = Arc::new(ReservationEngine::new(
            registry.clone(),
            CheckinTokenService::new("payment-test-secret"),
        ));
        let reservation = engine
            .create(
                ReservationCreate {
                    customer_id: 1,
                    restaurant_id: 1,
                    reservation_time: Utc::now() + chrono::Duration::hours(1),
                    party_size: 2,
                    duration_minutes: None,
                    group_emails: None,
                },
                Utc::now(),
            )
            .unwrap();
        let gateway = Arc::new(MockPaymentGateway::new(
            Duration::ZERO,
            paypal_failure_percent,
        ));
        let recorder = PaymentRecorder::new(engine.clone(), gateway, Duration::from_secs(1));
        (engine, recorder, reservation.id)
    }

    #[test]
    fn test_cash_payment_completes_immediately() {
        let (_engine, recorder, reservation_id) = recorder(0);
        let payment = recorder.record_cash(reservation_id, Decimal::from(55)).unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.transaction_id.unwrap().starts_with("CASH_"));
        assert!(recorder.is_reservation_paid(reservation_id));
    }

    #[test]
    fn test_duplicate_completed_payment_rejected() {
        let (_engine, recorder, reservation_id) = recorder(0);
        recorder.record_cash(reservation_id, Decimal::from(55)).unwrap();

        assert!(matches!(
            recorder.record_cash(reservation_id, Decimal::from(55)),
            Err(PaymentError::AlreadyCompleted(_))
        ));
    }

    #[test]
    fn test_unknown_reservation_rejected() {
        let (_engine, recorder, _) = recorder(0);
        assert!(matches!(
            recorder.record_cash(999, Decimal::from(10)),
            Err(PaymentError::Engine(EngineError::NotFound(999)))
        ));
    }

    #[tokio::test]
    async fn test_electronic_payment_success() {
        let (_engine, recorder, reservation_id) = recorder(0);
        let payment = recorder
            .record_electronic(reservation_id, Decimal::from(80), PaymentMethod::Paypal, "me@pp")
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.transaction_id.unwrap().starts_with("PAYPAL_"));
    }

    #[tokio::test]
    async fn test_electronic_payment_failure_is_recorded_and_surfaced() {
        let (_engine, recorder, reservation_id) = recorder(100);
        let result = recorder
            .record_electronic(reservation_id, Decimal::from(80), PaymentMethod::Paypal, "me@pp")
            .await;

        assert!(matches!(result, Err(PaymentError::Gateway(_))));
        let attempt = recorder.get_by_reservation(reservation_id).unwrap();
        assert_eq!(attempt.status, PaymentStatus::Failed);
        assert!(!recorder.is_reservation_paid(reservation_id));
    }

    #[tokio::test]
    async fn test_cash_is_not_electronic() {
        let (_engine, recorder, reservation_id) = recorder(0);
        assert!(matches!(
            recorder
                .record_electronic(reservation_id, Decimal::from(10), PaymentMethod::Cash, "")
                .await,
            Err(PaymentError::InvalidMethod(PaymentMethod::Cash))
        ));
    }

    #[test]
    fn test_refund_rules() {
        let (_engine, recorder, reservation_id) = recorder(0);
        let payment = recorder.record_cash(reservation_id, Decimal::from(50)).unwrap();

        // Exceeding the original amount is rejected
        assert!(matches!(
            recorder.refund(payment.id, Decimal::from(60)),
            Err(PaymentError::RefundExceedsAmount { .. })
        ));

        let refunded = recorder.refund(payment.id, Decimal::from(30)).unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);
        assert_eq!(refunded.refund_amount, Some(Decimal::from(30)));

        // A refunded payment cannot be refunded again
        assert!(matches!(
            recorder.refund(payment.id, Decimal::from(10)),
            Err(PaymentError::NotRefundable { .. })
        ));
    }
}
