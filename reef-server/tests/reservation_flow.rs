//! End-to-end reservation lifecycle flows against the assembled services

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use reef_server::checkin::CheckinTokenService;
use reef_server::payments::{MockPaymentGateway, PaymentRecorder};
use reef_server::registry::TableRegistry;
use reef_server::reservations::ReservationEngine;
use reef_server::waiter::{ClientError, CreateKitchenOrder, OrderClient, WaiterService};
use shared::models::{
    DiningTableCreate, KitchenOrder, KitchenOrderStatus, PaymentStatus, ReservationCreate,
    ReservationStatus, TableStatus,
};

/// Minimal in-memory kitchen double
struct StubKitchen {
    orders: RwLock<Vec<KitchenOrder>>,
}

impl StubKitchen {
    fn new() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OrderClient for StubKitchen {
    async fn list_active_orders(&self) -> Result<Vec<KitchenOrder>, ClientError> {
        Ok(self.orders.read().clone())
    }

    async fn create_order(&self, order: CreateKitchenOrder) -> Result<KitchenOrder, ClientError> {
        let mut orders = self.orders.write();
        let created = KitchenOrder {
            id: orders.len() as i64 + 1,
            table_id: order.table_id,
            reservation_id: order.reservation_id,
            items: order.items,
            status: KitchenOrderStatus::Pending,
            total_price: order.total_price,
        };
        orders.push(created.clone());
        Ok(created)
    }

    async fn mark_served(&self, order_id: i64) -> Result<(), ClientError> {
        let mut orders = self.orders.write();
        orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .map(|o| o.status = KitchenOrderStatus::Served)
            .ok_or(ClientError::Upstream {
                status: 404,
                message: format!("order {} not found", order_id),
            })
    }
}

struct Fixture {
    registry: Arc<TableRegistry>,
    engine: Arc<ReservationEngine>,
    waiter: WaiterService,
    payments: PaymentRecorder,
}

fn fixture() -> Fixture {
    let registry = Arc::new(TableRegistry::new());
    let engine = Arc::new(ReservationEngine::new(
        registry.clone(),
        CheckinTokenService::new("flow-test-secret"),
    ));
    let waiter = WaiterService::new(engine.clone(), registry.clone(), Arc::new(StubKitchen::new()));
    let payments = PaymentRecorder::new(
        engine.clone(),
        Arc::new(MockPaymentGateway::new(StdDuration::ZERO, 0)),
        StdDuration::from_secs(1),
    );
    Fixture {
        registry,
        engine,
        waiter,
        payments,
    }
}

#[test]
fn full_reservation_lifecycle_mirrors_table_state() {
    let f = fixture();
    let table = f.registry.create(DiningTableCreate {
        restaurant_id: 1,
        table_number: 1,
        capacity: Some(4),
    });
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 18, 0, 0).unwrap();

    // Create: party of 2, 2 hours out, one free 4-seat table
    let reservation = f
        .engine
        .create(
            ReservationCreate {
                customer_id: 7,
                restaurant_id: 1,
                reservation_time: now + Duration::hours(2),
                party_size: 2,
                duration_minutes: None,
                group_emails: None,
            },
            now,
        )
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(f.registry.get(table.id).unwrap().status, TableStatus::Reserved);

    // Check in
    let reservation = f.engine.check_in(reservation.id, now + Duration::hours(2)).unwrap();
    assert_eq!(reservation.status, ReservationStatus::CheckedIn);
    assert_eq!(f.registry.get(table.id).unwrap().status, TableStatus::Occupied);

    // Complete
    let reservation = f.engine.complete(reservation.id).unwrap();
    assert_eq!(reservation.status, ReservationStatus::Completed);
    let table = f.registry.get(table.id).unwrap();
    assert_eq!(table.status, TableStatus::Cleaning);
    assert_eq!(table.current_reservation_id, None);
}

#[tokio::test]
async fn checkin_token_round_trip_drives_checkin() {
    let f = fixture();
    f.registry.create(DiningTableCreate {
        restaurant_id: 1,
        table_number: 1,
        capacity: Some(4),
    });
    let tokens = CheckinTokenService::new("flow-test-secret");
    let now = Utc::now();

    let reservation = f
        .engine
        .create(
            ReservationCreate {
                customer_id: 7,
                restaurant_id: 1,
                reservation_time: now + Duration::hours(1),
                party_size: 2,
                duration_minutes: None,
                group_emails: None,
            },
            now,
        )
        .unwrap();

    // The token stored on the reservation validates against a service
    // sharing the secret, and carries the reservation id
    let claims = tokens.validate(reservation.qr_token.as_ref().unwrap()).unwrap();
    assert_eq!(claims.reservation_id, reservation.id);
    assert_eq!(claims.guest_id, None);

    let checked_in = f.engine.check_in(claims.reservation_id, now).unwrap();
    assert_eq!(checked_in.status, ReservationStatus::CheckedIn);
}

#[tokio::test]
async fn waiter_closes_out_a_dinner_service() {
    let f = fixture();
    let table = f.registry.create(DiningTableCreate {
        restaurant_id: 1,
        table_number: 3,
        capacity: Some(4),
    });
    let now = Utc::now();

    // Walk-in party sits down and orders
    let walk_in = f.engine.create_walk_in(table.id, 2, now).unwrap();
    let order = f
        .waiter
        .create_order(CreateKitchenOrder {
            table_id: Some(table.id),
            reservation_id: Some(walk_in.id),
            items: Vec::new(),
            total_price: Some(31.5),
        })
        .await
        .unwrap();

    // Everything served, bill settled in cash, reservation completed
    f.waiter.mark_order_served(order.id).await.unwrap();
    let payment = f.payments.record_cash(walk_in.id, Decimal::from(31)).unwrap();
    assert_eq!(payment.status, PaymentStatus::Completed);
    f.engine.complete(walk_in.id).unwrap();

    // Clear and finish: CLEANING stop first, then full release
    assert_eq!(f.registry.get(table.id).unwrap().status, TableStatus::Cleaning);
    f.waiter.finish_table(table.id).await.unwrap();
    let table = f.registry.get(table.id).unwrap();
    assert_eq!(table.status, TableStatus::Available);
    assert_eq!(table.current_reservation_id, None);
}

#[test]
fn pending_reservation_waits_for_manual_assignment() {
    let f = fixture();
    let now = Utc::now();

    // Restaurant is full
    let reservation = f
        .engine
        .create(
            ReservationCreate {
                customer_id: 9,
                restaurant_id: 1,
                reservation_time: now + Duration::hours(4),
                party_size: 6,
                duration_minutes: None,
                group_emails: None,
            },
            now,
        )
        .unwrap();
    assert_eq!(reservation.status, ReservationStatus::Pending);

    // A large table opens up later; staff assigns it manually
    let table = f.registry.create(DiningTableCreate {
        restaurant_id: 1,
        table_number: 12,
        capacity: Some(8),
    });
    let reservation = f.engine.assign_table(reservation.id, table.id).unwrap();
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(f.registry.get(table.id).unwrap().status, TableStatus::Reserved);
}
