//! Reservation Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel customer id for walk-in reservations
pub const WALK_IN_CUSTOMER_ID: i64 = 0;

/// Reservation lifecycle status (预订状态)
///
/// ```text
/// PENDING --(table found)--> CONFIRMED
/// PENDING --(cancel)--> CANCELLED
/// CONFIRMED --(checkin)--> CHECKED_IN
/// CONFIRMED --(cancel)--> CANCELLED
/// CONFIRMED --(grace elapsed, no checkin)--> NO_SHOW
/// CHECKED_IN --(complete)--> COMPLETED
/// CHECKED_IN --(overstay)--> TIMEOUT_WARNING
/// TIMEOUT_WARNING --(complete)--> COMPLETED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
    TimeoutWarning,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::CheckedIn => "CHECKED_IN",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
            Self::TimeoutWarning => "TIMEOUT_WARNING",
        }
    }

    /// 终态：不再参与任何生命周期转换
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Parse the wire representation, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "CHECKED_IN" => Some(Self::CheckedIn),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            "NO_SHOW" => Some(Self::NoShow),
            "TIMEOUT_WARNING" => Some(Self::TimeoutWarning),
            _ => None,
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Group reservation member
///
/// Owned exclusively by its parent reservation; each member carries an
/// individually signed check-in token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    /// 1-based guest id, unique within the reservation
    pub guest_id: i64,
    pub name: String,
    pub email: String,
    pub qr_token: String,
    pub checked_in: bool,
}

/// Reservation entity (预订)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub table_id: Option<i64>,
    /// Scheduled arrival time
    pub reservation_time: DateTime<Utc>,
    /// Expected visit duration in minutes
    pub duration_minutes: i64,
    pub party_size: i32,
    pub status: ReservationStatus,
    pub is_group: bool,
    /// Signed check-in token; absent for walk-ins
    pub qr_token: Option<String>,
    /// Cancellation or absence fee, set on CANCELLED / NO_SHOW
    pub cancellation_fee: Option<Decimal>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub group_members: Vec<GroupMember>,
    /// Unix millis
    pub created_at: i64,
    /// Unix millis
    pub updated_at: i64,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub reservation_time: DateTime<Utc>,
    pub party_size: i32,
    pub duration_minutes: Option<i64>,
    /// One group member is created per email; presence makes this a group reservation
    pub group_emails: Option<Vec<String>>,
}
