//! 支付模块 - payment recording against reservations
//!
//! Cash is recorded synchronously; electronic methods go through the
//! [`PaymentGateway`] abstraction (a mock gateway with simulated latency
//! in this deployment). Completing the reservation after a successful
//! payment is the caller's choreography, not this module's; see the
//! payments API handler.

mod gateway;
mod recorder;

pub use gateway::{
    ChargeRequest, GatewayError, GatewayReceipt, MockPaymentGateway, PaymentGateway,
};
pub use recorder::{PaymentError, PaymentRecorder, PaymentResult};
