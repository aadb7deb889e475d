//! Kitchen order service client
//!
//! The kitchen service owns order state; this side only reads it and
//! issues the single staff-triggered write (mark served). All transport
//! failures surface as [`ClientError::Unavailable`] so callers can decide
//! between degrading and propagating.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{KitchenOrder, KitchenOrderItem};
use thiserror::Error;

/// Kitchen client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("kitchen service unavailable: {0}")]
    Unavailable(String),

    #[error("kitchen service returned {status}: {message}")]
    Upstream { status: u16, message: String },
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        AppError::with_message(ErrorCode::UpstreamUnavailable, err.to_string())
    }
}

/// New order payload sent to the kitchen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKitchenOrder {
    pub table_id: Option<i64>,
    pub reservation_id: Option<i64>,
    pub items: Vec<KitchenOrderItem>,
    pub total_price: Option<f64>,
}

/// Narrow interface over the external kitchen order service
#[async_trait]
pub trait OrderClient: Send + Sync {
    /// Orders in non-terminal statuses (everything except CANCELLED)
    async fn list_active_orders(&self) -> Result<Vec<KitchenOrder>, ClientError>;

    /// Forward a new order (pass-through, kitchen assigns the id)
    async fn create_order(&self, order: CreateKitchenOrder) -> Result<KitchenOrder, ClientError>;

    /// Staff-triggered write: mark an order served
    async fn mark_served(&self, order_id: i64) -> Result<(), ClientError>;
}

/// HTTP implementation against the kitchen service REST API
pub struct HttpOrderClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpOrderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl OrderClient for HttpOrderClient {
    async fn list_active_orders(&self) -> Result<Vec<KitchenOrder>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/orders/active"))
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Upstream {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))
    }

    async fn create_order(&self, order: CreateKitchenOrder) -> Result<KitchenOrder, ClientError> {
        let response = self
            .http
            .post(self.url("/api/orders"))
            .json(&order)
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Upstream {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))
    }

    async fn mark_served(&self, order_id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.url(&format!("/api/orders/{}/served", order_id)))
            .send()
            .await
            .map_err(|e| ClientError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClientError::Upstream {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}
