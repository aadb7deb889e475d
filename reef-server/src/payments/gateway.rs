//! Payment gateway abstraction
//!
//! The real system never ships real payments; the gateway is a capability
//! that takes a charge request and answers success (with a transaction id)
//! or failure after some processing latency. Callers must bound the wait
//! themselves (`tokio::time::timeout`).

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::PaymentMethod;
use std::time::Duration;
use thiserror::Error;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

/// Charge request forwarded to the gateway
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub reservation_id: i64,
    pub amount: Decimal,
    pub method: PaymentMethod,
    /// Opaque instrument token (card token, wallet email, ...)
    pub token: String,
}

/// Successful charge
#[derive(Debug, Clone)]
pub struct GatewayReceipt {
    pub transaction_id: String,
}

/// External payment capability
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> Result<GatewayReceipt, GatewayError>;
}

/// Demo gateway: fixed latency, card always succeeds, PayPal fails at a
/// configured rate
pub struct MockPaymentGateway {
    latency: Duration,
    paypal_failure_percent: u32,
}

impl MockPaymentGateway {
    pub fn new(latency: Duration, paypal_failure_percent: u32) -> Self {
        Self {
            latency,
            paypal_failure_percent,
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn charge(&self, request: ChargeRequest) -> Result<GatewayReceipt, GatewayError> {
        // Simulated processing delay
        tokio::time::sleep(self.latency).await;

        match request.method {
            PaymentMethod::CreditCard => Ok(GatewayReceipt {
                transaction_id: format!("CARD_{}", uuid::Uuid::new_v4()),
            }),
            PaymentMethod::Paypal => {
                let roll = {
                    use rand::Rng;
                    rand::thread_rng().gen_range(0..100)
                };
                if roll < self.paypal_failure_percent {
                    Err(GatewayError::Declined("PayPal payment failed (demo)".into()))
                } else {
                    Ok(GatewayReceipt {
                        transaction_id: format!("PAYPAL_{}", uuid::Uuid::new_v4()),
                    })
                }
            }
            PaymentMethod::Cash => Err(GatewayError::Declined(
                "cash is not an electronic payment method".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: PaymentMethod) -> ChargeRequest {
        ChargeRequest {
            reservation_id: 1,
            amount: Decimal::from(42),
            method,
            token: "tok_test".into(),
        }
    }

    #[tokio::test]
    async fn test_card_always_succeeds() {
        let gateway = MockPaymentGateway::new(Duration::ZERO, 100);
        let receipt = gateway.charge(request(PaymentMethod::CreditCard)).await.unwrap();
        assert!(receipt.transaction_id.starts_with("CARD_"));
    }

    #[tokio::test]
    async fn test_paypal_failure_rate_extremes() {
        let always_fails = MockPaymentGateway::new(Duration::ZERO, 100);
        assert!(matches!(
            always_fails.charge(request(PaymentMethod::Paypal)).await,
            Err(GatewayError::Declined(_))
        ));

        let never_fails = MockPaymentGateway::new(Duration::ZERO, 0);
        let receipt = never_fails.charge(request(PaymentMethod::Paypal)).await.unwrap();
        assert!(receipt.transaction_id.starts_with("PAYPAL_"));
    }

    #[tokio::test]
    async fn test_cash_is_rejected() {
        let gateway = MockPaymentGateway::new(Duration::ZERO, 0);
        assert!(matches!(
            gateway.charge(request(PaymentMethod::Cash)).await,
            Err(GatewayError::Declined(_))
        ));
    }
}
