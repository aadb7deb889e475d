//! Unified error codes for the Reef Reserve services
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Check-in token errors
//! - 4xxx: Reservation errors
//! - 5xxx: Payment errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Check-in Token ====================
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid (malformed or bad signature)
    TokenInvalid = 1004,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Operation illegal in the reservation's current lifecycle state
    ReservationInvalidState = 4002,
    /// Reservation has no table assigned
    ReservationMissingTable = 4003,
    /// Group member not found on reservation
    GuestNotFound = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed (gateway declined)
    PaymentFailed = 5001,
    /// Payment not found
    PaymentNotFound = 5002,
    /// Payment already completed for this reservation
    PaymentAlreadyCompleted = 5003,
    /// Invalid payment method for this operation
    PaymentInvalidMethod = 5004,
    /// Payment is not refundable in its current status
    PaymentNotRefundable = 5005,
    /// Refund amount exceeds payment
    PaymentRefundExceedsAmount = 5006,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table is held by a different reservation
    TableConflict = 7002,
    /// Table is in the wrong status for this operation
    TableInvalidStatus = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Upstream collaborator unreachable or erroring
    UpstreamUnavailable = 9003,
    /// Operation timeout
    TimeoutError = 9004,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            // Check-in token
            ErrorCode::TokenExpired => "Check-in token has expired",
            ErrorCode::TokenInvalid => "Check-in token is invalid",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationInvalidState => {
                "Operation not allowed in current reservation state"
            }
            ErrorCode::ReservationMissingTable => "Reservation has no table assigned",
            ErrorCode::GuestNotFound => "Group member not found",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::PaymentNotFound => "Payment not found",
            ErrorCode::PaymentAlreadyCompleted => "Payment already completed for this reservation",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",
            ErrorCode::PaymentNotRefundable => "Payment is not refundable",
            ErrorCode::PaymentRefundExceedsAmount => "Refund amount exceeds original payment",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableConflict => "Table is held by a different reservation",
            ErrorCode::TableInvalidStatus => "Table is in the wrong status for this operation",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::UpstreamUnavailable => "Upstream service unavailable",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),

            // Check-in token
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::ReservationInvalidState),
            4003 => Ok(ErrorCode::ReservationMissingTable),
            4004 => Ok(ErrorCode::GuestNotFound),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentNotFound),
            5003 => Ok(ErrorCode::PaymentAlreadyCompleted),
            5004 => Ok(ErrorCode::PaymentInvalidMethod),
            5005 => Ok(ErrorCode::PaymentNotRefundable),
            5006 => Ok(ErrorCode::PaymentRefundExceedsAmount),

            // Table
            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableConflict),
            7003 => Ok(ErrorCode::TableInvalidStatus),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::UpstreamUnavailable),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
