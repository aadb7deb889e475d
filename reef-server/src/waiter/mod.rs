//! 前厅服务 - waiter composite view and staff actions
//!
//! Merges table state (from the registry), reservation state (from the
//! engine) and order state (from the external kitchen service) into the
//! single live view waiters work from, and hosts the staff actions that
//! close out a table.

mod order_client;
mod service;

pub use order_client::{ClientError, CreateKitchenOrder, HttpOrderClient, OrderClient};
pub use service::{
    FloorOrder, FloorOrderItem, FloorOrderStatus, FloorTable, FloorTableStatus, WaiterError,
    WaiterService, WaiterState,
};
