//! Reservation Engine - 预订生命周期
//!
//! This module owns the reservation state machine and the time-driven
//! sweep that advances it without a human click:
//!
//! - [`engine::ReservationEngine`]: create / cancel / check-in / complete /
//!   walk-in / no-show / timeout transitions, table binding via the
//!   [`crate::registry::TableRegistry`]
//! - [`sweep::ReservationSweeper`]: periodic no-show and overstay detection

mod engine;
mod sweep;

pub use engine::{EngineError, EngineResult, ReservationEngine};
pub use sweep::ReservationSweeper;

#[cfg(test)]
mod tests;
