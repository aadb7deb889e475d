//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table occupancy status (桌台状态)
///
/// Lifecycle: AVAILABLE → RESERVED → OCCUPIED → CLEANING → AVAILABLE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Reserved,
    Occupied,
    Cleaning,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Reserved => "RESERVED",
            Self::Occupied => "OCCUPIED",
            Self::Cleaning => "CLEANING",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dining table entity (桌台)
///
/// `current_reservation_id` is non-null iff status ∈ {RESERVED, OCCUPIED}.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i64,
    pub restaurant_id: i64,
    pub table_number: i32,
    pub capacity: i32,
    pub status: TableStatus,
    pub current_reservation_id: Option<i64>,
}

impl DiningTable {
    /// 检查状态与预订绑定是否一致
    pub fn binding_consistent(&self) -> bool {
        match self.status {
            TableStatus::Reserved | TableStatus::Occupied => {
                self.current_reservation_id.is_some()
            }
            TableStatus::Available | TableStatus::Cleaning => {
                self.current_reservation_id.is_none()
            }
        }
    }
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub restaurant_id: i64,
    pub table_number: i32,
    pub capacity: Option<i32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableUpdate {
    pub table_number: Option<i32>,
    pub capacity: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_consistency() {
        let mut table = DiningTable {
            id: 1,
            restaurant_id: 1,
            table_number: 3,
            capacity: 4,
            status: TableStatus::Available,
            current_reservation_id: None,
        };
        assert!(table.binding_consistent());

        table.status = TableStatus::Reserved;
        assert!(!table.binding_consistent());

        table.current_reservation_id = Some(99);
        assert!(table.binding_consistent());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TableStatus::Cleaning).unwrap();
        assert_eq!(json, "\"CLEANING\"");
        let parsed: TableStatus = serde_json::from_str("\"AVAILABLE\"").unwrap();
        assert_eq!(parsed, TableStatus::Available);
    }
}
