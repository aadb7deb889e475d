//! 扫码入座 - stateless QR check-in tokens
//!
//! Token issuance and validation are pure functions over a server-held
//! secret; no session store is involved, so any entry point (kiosk, QR
//! scan, plain URL) can redeem a token offline.

mod token;

pub use token::{CheckinClaims, CheckinTokenService, TokenError, TOKEN_VALIDITY_DAYS};
