//! 工具模块

pub mod logger;

// Re-export unified error types from shared for handler signatures
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
