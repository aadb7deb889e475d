//! Check-in token service
//!
//! Wire format: url-safe base64 of `payload:signature` where
//! `payload = reservationId:guestId-or-0:expiryEpochSeconds` and the
//! signature is an HMAC-SHA256 over the payload, itself url-safe base64.
//! The format is stable across redeployments sharing the same secret.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use ring::hmac;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Token validity period in days
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// Terminal, non-retryable validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("invalid token format")]
    InvalidFormat,

    #[error("token expired")]
    Expired,

    #[error("invalid token signature")]
    InvalidSignature,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::new(ErrorCode::TokenExpired),
            TokenError::InvalidFormat | TokenError::InvalidSignature => {
                AppError::with_message(ErrorCode::TokenInvalid, err.to_string())
            }
        }
    }
}

/// Claims embedded in a valid token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckinClaims {
    pub reservation_id: i64,
    /// Group member guest id; `None` for the primary reservation token
    pub guest_id: Option<i64>,
    /// Expiry as epoch seconds
    pub expires_at: i64,
}

/// Check-in token service
#[derive(Clone)]
pub struct CheckinTokenService {
    key: hmac::Key,
}

impl std::fmt::Debug for CheckinTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckinTokenService").finish_non_exhaustive()
    }
}

impl CheckinTokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()),
        }
    }

    /// Issue a token valid for [`TOKEN_VALIDITY_DAYS`] from now
    pub fn issue(&self, reservation_id: i64, guest_id: Option<i64>) -> String {
        self.issue_at(reservation_id, guest_id, Utc::now())
    }

    /// Issue with an explicit clock (tests use fixed clocks)
    pub fn issue_at(
        &self,
        reservation_id: i64,
        guest_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> String {
        let expiry = (now + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp();
        let payload = format!("{}:{}:{}", reservation_id, guest_id.unwrap_or(0), expiry);
        let tag = hmac::sign(&self.key, payload.as_bytes());
        let signature = URL_SAFE.encode(tag.as_ref());
        URL_SAFE.encode(format!("{}:{}", payload, signature))
    }

    /// Validate a token against the current clock
    pub fn validate(&self, token: &str) -> Result<CheckinClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate with an explicit clock
    ///
    /// Rejection order: structure, expiry, signature. All failures are
    /// plain values; validation never panics on attacker-controlled input.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<CheckinClaims, TokenError> {
        let decoded = URL_SAFE
            .decode(token.as_bytes())
            .map_err(|_| TokenError::InvalidFormat)?;
        let decoded = String::from_utf8(decoded).map_err(|_| TokenError::InvalidFormat)?;

        let parts: Vec<&str> = decoded.split(':').collect();
        if parts.len() != 4 {
            return Err(TokenError::InvalidFormat);
        }

        let reservation_id: i64 = parts[0].parse().map_err(|_| TokenError::InvalidFormat)?;
        let guest_raw: i64 = parts[1].parse().map_err(|_| TokenError::InvalidFormat)?;
        let expires_at: i64 = parts[2].parse().map_err(|_| TokenError::InvalidFormat)?;

        if now.timestamp() > expires_at {
            return Err(TokenError::Expired);
        }

        let signature = URL_SAFE
            .decode(parts[3].as_bytes())
            .map_err(|_| TokenError::InvalidFormat)?;
        let payload = format!("{}:{}:{}", parts[0], parts[1], parts[2]);
        hmac::verify(&self.key, payload.as_bytes(), &signature)
            .map_err(|_| TokenError::InvalidSignature)?;

        Ok(CheckinClaims {
            reservation_id,
            guest_id: (guest_raw != 0).then_some(guest_raw),
            expires_at,
        })
    }

    /// Browser-friendly redemption URL for a token
    pub fn checkin_url(&self, base_url: &str, reservation_id: i64, guest_id: Option<i64>) -> String {
        format!(
            "{}/api/checkin?token={}",
            base_url.trim_end_matches('/'),
            self.issue(reservation_id, guest_id)
        )
    }
}
