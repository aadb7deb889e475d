use super::*;
use crate::checkin::CheckinTokenService;
use crate::registry::TableRegistry;
use chrono::{DateTime, TimeZone, Utc};
use shared::models::{DiningTableCreate, ReservationCreate, ReservationStatus, TableStatus};
use std::sync::Arc;

mod test_lifecycle;

/// Fixed clock for deterministic time arithmetic
fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 18, 0, 0).unwrap()
}

fn create_test_engine() -> (Arc<TableRegistry>, Arc<ReservationEngine>) {
    let registry = Arc::new(TableRegistry::new());
    let engine = Arc::new(ReservationEngine::new(
        registry.clone(),
        CheckinTokenService::new("engine-test-secret"),
    ));
    (registry, engine)
}

fn add_table(registry: &TableRegistry, table_number: i32, capacity: i32) -> i64 {
    registry
        .create(DiningTableCreate {
            restaurant_id: 1,
            table_number,
            capacity: Some(capacity),
        })
        .id
}

fn create_request(party_size: i32, reservation_time: DateTime<Utc>) -> ReservationCreate {
    ReservationCreate {
        customer_id: 10,
        restaurant_id: 1,
        reservation_time,
        party_size,
        duration_minutes: None,
        group_emails: None,
    }
}
