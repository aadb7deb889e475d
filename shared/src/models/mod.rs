//! Domain models shared across the Reef Reserve services

mod dining_table;
mod kitchen_order;
mod payment;
mod reservation;

pub use dining_table::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
pub use kitchen_order::{KitchenOrder, KitchenOrderItem, KitchenOrderStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use reservation::{
    GroupMember, Reservation, ReservationCreate, ReservationStatus, WALK_IN_CUSTOMER_ID,
};
