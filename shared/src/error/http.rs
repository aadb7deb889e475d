//! HTTP status mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::Success => StatusCode::OK,

            // 400 Bad Request
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,

            // 403 Forbidden (check-in token rejections)
            ErrorCode::TokenExpired | ErrorCode::TokenInvalid => StatusCode::FORBIDDEN,

            // 404 Not Found
            ErrorCode::NotFound
            | ErrorCode::ReservationNotFound
            | ErrorCode::GuestNotFound
            | ErrorCode::PaymentNotFound
            | ErrorCode::TableNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            ErrorCode::AlreadyExists
            | ErrorCode::TableConflict
            | ErrorCode::PaymentAlreadyCompleted => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (lifecycle/state violations)
            ErrorCode::ReservationInvalidState
            | ErrorCode::ReservationMissingTable
            | ErrorCode::TableInvalidStatus
            | ErrorCode::PaymentFailed
            | ErrorCode::PaymentInvalidMethod
            | ErrorCode::PaymentNotRefundable
            | ErrorCode::PaymentRefundExceedsAmount => StatusCode::UNPROCESSABLE_ENTITY,

            // 5xx
            ErrorCode::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
            ErrorCode::TimeoutError => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::Unknown | ErrorCode::InternalError | ErrorCode::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::TokenInvalid.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ErrorCode::ReservationNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::TableConflict.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::ReservationInvalidState.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::UpstreamUnavailable.http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
