//! Kitchen order DTOs (external Order service, referenced not owned)

use serde::{Deserialize, Serialize};

/// Order status as reported by the kitchen service wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenOrderStatus {
    Pending,
    InKitchen,
    Ready,
    Served,
    Cancelled,
    /// Forward compatibility: unknown statuses from newer kitchen deployments
    #[serde(other)]
    Unknown,
}

/// A single order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenOrderItem {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

/// Order as read from the kitchen service
///
/// `table_id` may be unset for preorders placed before a table was
/// assigned; resolution then goes through `reservation_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenOrder {
    pub id: i64,
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default)]
    pub reservation_id: Option<i64>,
    #[serde(default)]
    pub items: Vec<KitchenOrderItem>,
    pub status: KitchenOrderStatus,
    #[serde(default)]
    pub total_price: Option<f64>,
}
