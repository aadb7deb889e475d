//! Waiter composite view and staff table actions
//!
//! The view is rebuilt on every query from three independent reads
//! (tables, reservations, orders) with no cross-read consistency
//! guarantee: it is a best-effort live snapshot, and an unreachable
//! kitchen degrades to an empty order list instead of failing the view.

use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{
    KitchenOrder, KitchenOrderStatus, Reservation, ReservationStatus, TableStatus,
};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::order_client::{ClientError, OrderClient};
use crate::registry::TableRegistry;
use crate::reservations::{EngineError, ReservationEngine};

/// Waiter-facing table status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorTableStatus {
    Empty,
    Reserved,
    Occupied,
    NeedsClearing,
}

impl From<TableStatus> for FloorTableStatus {
    fn from(status: TableStatus) -> Self {
        match status {
            TableStatus::Available => Self::Empty,
            TableStatus::Reserved => Self::Reserved,
            TableStatus::Occupied => Self::Occupied,
            TableStatus::Cleaning => Self::NeedsClearing,
        }
    }
}

/// Waiter-facing order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorOrderStatus {
    InKitchen,
    ReadyToServe,
    Served,
}

impl FloorOrderStatus {
    /// Wire status → presentation status; CANCELLED orders are dropped
    /// by the caller before mapping
    fn from_wire(status: KitchenOrderStatus) -> Self {
        match status {
            KitchenOrderStatus::Pending | KitchenOrderStatus::InKitchen => Self::InKitchen,
            KitchenOrderStatus::Ready => Self::ReadyToServe,
            KitchenOrderStatus::Served => Self::Served,
            // Unknown future statuses read as still cooking
            KitchenOrderStatus::Cancelled | KitchenOrderStatus::Unknown => Self::InKitchen,
        }
    }
}

/// One table as the waiter sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorTable {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub capacity: i32,
    pub status: FloorTableStatus,
    pub current_reservation_id: Option<i64>,
}

/// One order line as the waiter sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorOrderItem {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Option<f64>,
}

/// One order as the waiter sees it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorOrder {
    pub id: i64,
    /// 0 when the order could not be resolved to a table
    pub table_id: i64,
    pub reservation_id: Option<i64>,
    pub status: FloorOrderStatus,
    pub items: Vec<FloorOrderItem>,
    pub total_price: Option<f64>,
}

/// The waiter state endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaiterState {
    pub tables: Vec<FloorTable>,
    pub orders: Vec<FloorOrder>,
}

/// Waiter action errors
#[derive(Debug, Error)]
pub enum WaiterError {
    #[error("table {table_id} has {count} order(s) ready to serve")]
    ReadyOrders { table_id: i64, count: usize },

    #[error("table {table_id} is {status}, clearing requires OCCUPIED")]
    NotOccupied { table_id: i64, status: TableStatus },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Registry(#[from] crate::registry::RegistryError),

    #[error(transparent)]
    Kitchen(#[from] ClientError),
}

impl From<WaiterError> for AppError {
    fn from(err: WaiterError) -> Self {
        match err {
            WaiterError::ReadyOrders { table_id, count } => {
                AppError::conflict(format!(
                    "Table {} has {} order(s) ready to serve; serve them first",
                    table_id, count
                ))
                .with_detail("table_id", table_id)
            }
            WaiterError::NotOccupied { .. } => AppError::with_message(
                shared::error::ErrorCode::TableInvalidStatus,
                err.to_string(),
            ),
            WaiterError::Engine(e) => e.into(),
            WaiterError::Registry(e) => e.into(),
            WaiterError::Kitchen(e) => e.into(),
        }
    }
}

/// Front-of-house aggregation service
pub struct WaiterService {
    engine: Arc<ReservationEngine>,
    registry: Arc<TableRegistry>,
    orders: Arc<dyn OrderClient>,
}

impl WaiterService {
    pub fn new(
        engine: Arc<ReservationEngine>,
        registry: Arc<TableRegistry>,
        orders: Arc<dyn OrderClient>,
    ) -> Self {
        Self {
            engine,
            registry,
            orders,
        }
    }

    // ========================================================================
    // Composite view
    // ========================================================================

    /// Build the composite waiter state, live on every call
    pub async fn state(&self, restaurant_id: Option<i64>) -> WaiterState {
        let tables = match restaurant_id {
            Some(rid) => self.registry.list_by_restaurant(rid),
            None => self.registry.list(),
        };
        let reservations = self.engine.list();

        let mut floor_tables: Vec<FloorTable> = tables
            .iter()
            .map(|t| FloorTable {
                id: t.id,
                restaurant_id: t.restaurant_id,
                name: format!("Table {}", t.table_number),
                capacity: t.capacity,
                status: t.status.into(),
                current_reservation_id: t.current_reservation_id,
            })
            .collect();

        Self::backfill_reservations(&mut floor_tables, &reservations);

        // reservation → table mapping resolves preorders placed before a
        // table was known
        let reservation_tables: HashMap<i64, i64> = reservations
            .iter()
            .filter_map(|r| r.table_id.map(|t| (r.id, t)))
            .collect();

        let kitchen_orders = match self.orders.list_active_orders().await {
            Ok(orders) => orders,
            // Partial degradation over total failure: the floor plan is
            // still useful with a stale/empty order column.
            Err(e) => {
                tracing::warn!(error = %e, "Kitchen service unreachable, serving view without orders");
                Vec::new()
            }
        };

        let floor_orders = kitchen_orders
            .into_iter()
            .filter(|o| o.status != KitchenOrderStatus::Cancelled)
            .map(|o| Self::to_floor_order(o, &reservation_tables))
            .collect();

        WaiterState {
            tables: floor_tables,
            orders: floor_orders,
        }
    }

    /// A RESERVED table may briefly lack its binding (e.g. staleness
    /// between reads); recover it from the reservation side, first
    /// non-terminal match wins.
    fn backfill_reservations(tables: &mut [FloorTable], reservations: &[Reservation]) {
        for reservation in reservations {
            let Some(table_id) = reservation.table_id else {
                continue;
            };
            if !matches!(
                reservation.status,
                ReservationStatus::Pending
                    | ReservationStatus::Confirmed
                    | ReservationStatus::CheckedIn
            ) {
                continue;
            }
            if let Some(table) = tables.iter_mut().find(|t| t.id == table_id)
                && table.current_reservation_id.is_none()
            {
                table.current_reservation_id = Some(reservation.id);
            }
        }
    }

    fn to_floor_order(order: KitchenOrder, reservation_tables: &HashMap<i64, i64>) -> FloorOrder {
        let table_id = order
            .table_id
            .filter(|t| *t > 0)
            .or_else(|| {
                order
                    .reservation_id
                    .and_then(|rid| reservation_tables.get(&rid).copied())
            })
            .unwrap_or(0);

        FloorOrder {
            id: order.id,
            table_id,
            reservation_id: order.reservation_id,
            status: FloorOrderStatus::from_wire(order.status),
            items: order
                .items
                .into_iter()
                .map(|i| FloorOrderItem {
                    name: i.name,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                })
                .collect(),
            total_price: order.total_price,
        }
    }

    // ========================================================================
    // Staff actions
    // ========================================================================

    /// Forward a new order to the kitchen service
    pub async fn create_order(
        &self,
        order: super::order_client::CreateKitchenOrder,
    ) -> Result<KitchenOrder, WaiterError> {
        let created = self.orders.create_order(order).await?;
        tracing::info!(order_id = created.id, "Order forwarded to kitchen");
        Ok(created)
    }

    /// Pass-through to the kitchen service
    pub async fn mark_order_served(&self, order_id: i64) -> Result<(), WaiterError> {
        self.orders.mark_served(order_id).await?;
        tracing::info!(order_id, "Order marked served");
        Ok(())
    }

    /// Clear an occupied table for cleaning
    pub fn clear_table(&self, table_id: i64) -> Result<(), WaiterError> {
        let table = self.registry.get(table_id)?;
        if table.status != TableStatus::Occupied {
            return Err(WaiterError::NotOccupied {
                table_id,
                status: table.status,
            });
        }
        self.registry.mark_cleaning(table_id)?;
        tracing::info!(table_id, "Table cleared for cleaning");
        Ok(())
    }

    /// Finish a table: complete its active reservation (if any) and
    /// release the table fully to AVAILABLE
    ///
    /// Denied while any order for the table is still ready to serve;
    /// staff must serve everything first. Unlike `clear_table` this skips
    /// the CLEANING stop; the clear step already happened, or the table
    /// never had a reservation at all (walk-in cleanup).
    pub async fn finish_table(&self, table_id: i64) -> Result<(), WaiterError> {
        self.registry.get(table_id)?;

        let state = self.state(None).await;
        let ready = state
            .orders
            .iter()
            .filter(|o| o.table_id == table_id && o.status == FloorOrderStatus::ReadyToServe)
            .count();
        if ready > 0 {
            return Err(WaiterError::ReadyOrders {
                table_id,
                count: ready,
            });
        }

        if let Some(reservation) = self
            .engine
            .list_active()
            .into_iter()
            .find(|r| r.table_id == Some(table_id))
        {
            self.engine.complete(reservation.id)?;
            tracing::info!(
                table_id,
                reservation_id = reservation.id,
                "Completed active reservation for finished table"
            );
        }

        self.registry.free(table_id)?;
        tracing::info!(table_id, "Table finished and released");
        Ok(())
    }
}
