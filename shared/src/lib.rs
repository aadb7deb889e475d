//! Shared types for the Reef Reserve services
//!
//! Common types used across crates: unified error codes and responses,
//! domain models (tables, reservations, payments, kitchen orders) and
//! small utilities (timestamps, resource IDs).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
