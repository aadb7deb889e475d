//! ReservationEngine - reservation lifecycle and table coordination
//!
//! # State machine
//!
//! ```text
//! PENDING --(table found)--> CONFIRMED
//! PENDING --(cancel)--> CANCELLED*
//! CONFIRMED --(checkin)--> CHECKED_IN
//! CONFIRMED --(cancel)--> CANCELLED*
//! CONFIRMED --(grace elapsed, no checkin)--> NO_SHOW*
//! CHECKED_IN --(complete)--> COMPLETED*
//! CHECKED_IN --(overstay)--> TIMEOUT_WARNING
//! TIMEOUT_WARNING --(complete)--> COMPLETED*
//! ```
//!
//! Every mutation runs under the reservation's row entry; table state is
//! mirrored through the registry inside the same operation so the two
//! aggregates transition together. Time-dependent operations take `now`
//! explicitly so the sweep and the tests share one clock discipline.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    GroupMember, Reservation, ReservationCreate, ReservationStatus, WALK_IN_CUSTOMER_ID,
};
use shared::util::{now_millis, snowflake_id};
use std::sync::Arc;
use thiserror::Error;
use validator::ValidateEmail;

use crate::checkin::CheckinTokenService;
use crate::registry::{RegistryError, TableRegistry};

/// Grace window after the scheduled time before a CONFIRMED reservation
/// counts as a no-show
const NO_SHOW_GRACE_MINUTES: i64 = 15;

/// Free cancellation until this close to the scheduled time
const FREE_CANCEL_WINDOW_MINUTES: i64 = 30;

/// Default expected visit duration
const DEFAULT_DURATION_MINUTES: i64 = 120;

/// Engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("reservation {0} not found")]
    NotFound(i64),

    #[error("guest {guest_id} not found on reservation {reservation_id}")]
    GuestNotFound { reservation_id: i64, guest_id: i64 },

    #[error("reservation {id} is {actual}, operation requires {required}")]
    InvalidState {
        id: i64,
        actual: ReservationStatus,
        required: &'static str,
    },

    #[error("reservation {0} has no table assigned")]
    MissingTable(i64),

    #[error("invalid guest email: {0}")]
    InvalidEmail(String),

    #[error("party size must be at least 1, got {0}")]
    InvalidPartySize(i32),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::NotFound(id) => {
                AppError::with_message(ErrorCode::ReservationNotFound, err.to_string())
                    .with_detail("reservation_id", id)
            }
            EngineError::GuestNotFound { .. } => {
                AppError::with_message(ErrorCode::GuestNotFound, err.to_string())
            }
            EngineError::InvalidState { actual, required, .. } => {
                AppError::with_message(ErrorCode::ReservationInvalidState, err.to_string())
                    .with_detail("actual", actual.as_str())
                    .with_detail("required", required)
            }
            EngineError::MissingTable(id) => {
                AppError::with_message(ErrorCode::ReservationMissingTable, err.to_string())
                    .with_detail("reservation_id", id)
            }
            EngineError::InvalidEmail(_) | EngineError::InvalidPartySize(_) => {
                AppError::validation(err.to_string())
            }
            EngineError::Registry(e) => e.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Reservation lifecycle engine
pub struct ReservationEngine {
    reservations: DashMap<i64, Reservation>,
    registry: Arc<TableRegistry>,
    tokens: CheckinTokenService,
}

impl ReservationEngine {
    pub fn new(registry: Arc<TableRegistry>, tokens: CheckinTokenService) -> Self {
        Self {
            reservations: DashMap::new(),
            registry,
            tokens,
        }
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Create a reservation, auto-assigning the smallest fitting table
    ///
    /// With no table available the reservation stays PENDING without a
    /// table. A check-in token is always minted; `group_emails` adds one
    /// [`GroupMember`] per address, each with its own token.
    pub fn create(&self, data: ReservationCreate, now: DateTime<Utc>) -> EngineResult<Reservation> {
        if data.party_size < 1 {
            return Err(EngineError::InvalidPartySize(data.party_size));
        }
        if let Some(emails) = &data.group_emails {
            for email in emails {
                if !email.validate_email() {
                    return Err(EngineError::InvalidEmail(email.clone()));
                }
            }
        }

        let id = snowflake_id();
        let is_group = data.group_emails.as_ref().is_some_and(|e| !e.is_empty());

        // Candidates come smallest-first; a concurrent creator may steal
        // one between the scan and the reserve, so fall through conflicts
        // to the next candidate instead of failing the whole creation.
        let mut table_id = None;
        for candidate in self
            .registry
            .find_available(data.restaurant_id, data.party_size)
        {
            match self.registry.reserve(candidate.id, id) {
                Ok(table) => {
                    table_id = Some(table.id);
                    break;
                }
                Err(RegistryError::Conflict { held_by, .. }) => {
                    tracing::debug!(
                        table_id = candidate.id,
                        held_by,
                        "Candidate table lost to concurrent writer, trying next"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        let status = if table_id.is_some() {
            ReservationStatus::Confirmed
        } else {
            ReservationStatus::Pending
        };

        let group_members = data
            .group_emails
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, email)| {
                let guest_id = (i + 1) as i64;
                GroupMember {
                    guest_id,
                    name: email.clone(),
                    email,
                    qr_token: self.tokens.issue(id, Some(guest_id)),
                    checked_in: false,
                }
            })
            .collect();

        let reservation = Reservation {
            id,
            customer_id: data.customer_id,
            restaurant_id: data.restaurant_id,
            table_id,
            reservation_time: data.reservation_time,
            duration_minutes: data.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            party_size: data.party_size,
            status,
            is_group,
            qr_token: Some(self.tokens.issue(id, None)),
            cancellation_fee: None,
            checked_in_at: None,
            group_members,
            created_at: now.timestamp_millis(),
            updated_at: now.timestamp_millis(),
        };

        tracing::info!(
            reservation_id = id,
            status = %reservation.status,
            table_id = ?table_id,
            party_size = data.party_size,
            scheduled = %data.reservation_time,
            "Reservation created"
        );

        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    /// Walk-in guests: synthesize an already-checked-in reservation and
    /// occupy the table directly
    pub fn create_walk_in(
        &self,
        table_id: i64,
        party_size: i32,
        now: DateTime<Utc>,
    ) -> EngineResult<Reservation> {
        if party_size < 1 {
            return Err(EngineError::InvalidPartySize(party_size));
        }
        let table = self.registry.get(table_id)?;
        let id = snowflake_id();
        self.registry.occupy(table_id, id)?;

        let reservation = Reservation {
            id,
            customer_id: WALK_IN_CUSTOMER_ID,
            restaurant_id: table.restaurant_id,
            table_id: Some(table_id),
            reservation_time: now,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            party_size,
            status: ReservationStatus::CheckedIn,
            is_group: false,
            qr_token: None,
            cancellation_fee: None,
            checked_in_at: Some(now),
            group_members: Vec::new(),
            created_at: now.timestamp_millis(),
            updated_at: now.timestamp_millis(),
        };

        tracing::info!(reservation_id = id, table_id, party_size, "Walk-in seated");
        self.reservations.insert(id, reservation.clone());
        Ok(reservation)
    }

    // ========================================================================
    // Lifecycle transitions
    // ========================================================================

    /// Cancel a reservation, charging the late-cancellation fee and
    /// releasing the table
    pub fn cancel(&self, id: i64, now: DateTime<Utc>) -> EngineResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(EngineError::NotFound(id))?;

        if matches!(
            entry.status,
            ReservationStatus::Cancelled | ReservationStatus::Completed
        ) {
            return Err(EngineError::InvalidState {
                id,
                actual: entry.status,
                required: "not CANCELLED or COMPLETED",
            });
        }

        // Release the table before touching reservation fields so a
        // registry failure leaves the reservation untouched. A NO_SHOW
        // already released its table; freeing again could steal it from
        // whoever holds it now.
        if !entry.status.is_terminal()
            && let Some(table_id) = entry.table_id
        {
            self.registry.free(table_id)?;
        }

        let fee = Self::cancellation_fee(&entry, now);
        entry.cancellation_fee = Some(fee);
        entry.status = ReservationStatus::Cancelled;
        entry.updated_at = now_millis();

        tracing::info!(reservation_id = id, fee = %fee, "Reservation cancelled");
        Ok(entry.clone())
    }

    /// Late-cancellation fee: free until 30 minutes before the scheduled
    /// time, then 20 for groups and 10 otherwise
    pub fn cancellation_fee(reservation: &Reservation, now: DateTime<Utc>) -> Decimal {
        let minutes_until = (reservation.reservation_time - now).num_minutes();
        if minutes_until >= FREE_CANCEL_WINDOW_MINUTES {
            Decimal::ZERO
        } else if reservation.is_group {
            Decimal::from(20)
        } else {
            Decimal::from(10)
        }
    }

    /// Check in a reservation, occupying its table
    pub fn check_in(&self, id: i64, now: DateTime<Utc>) -> EngineResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(EngineError::NotFound(id))?;
        self.check_in_entry(&mut entry, now)?;
        Ok(entry.clone())
    }

    /// Check in an individual group member via their personal token
    ///
    /// The first scan also checks in the reservation itself; later scans
    /// only flag the member.
    pub fn check_in_guest(
        &self,
        id: i64,
        guest_id: i64,
        now: DateTime<Utc>,
    ) -> EngineResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(EngineError::NotFound(id))?;

        if entry.status.is_terminal() {
            return Err(EngineError::InvalidState {
                id,
                actual: entry.status,
                required: "a non-terminal state",
            });
        }
        if matches!(
            entry.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            self.check_in_entry(&mut entry, now)?;
        }

        let member = entry
            .group_members
            .iter_mut()
            .find(|m| m.guest_id == guest_id)
            .ok_or(EngineError::GuestNotFound {
                reservation_id: id,
                guest_id,
            })?;
        member.checked_in = true;
        entry.updated_at = now_millis();

        tracing::info!(reservation_id = id, guest_id, "Group member checked in");
        Ok(entry.clone())
    }

    fn check_in_entry(&self, entry: &mut Reservation, now: DateTime<Utc>) -> EngineResult<()> {
        if !matches!(
            entry.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            return Err(EngineError::InvalidState {
                id: entry.id,
                actual: entry.status,
                required: "PENDING or CONFIRMED",
            });
        }
        let table_id = entry.table_id.ok_or(EngineError::MissingTable(entry.id))?;

        self.registry.occupy(table_id, entry.id)?;
        entry.status = ReservationStatus::CheckedIn;
        entry.checked_in_at = Some(now);
        entry.updated_at = now_millis();

        tracing::info!(reservation_id = entry.id, table_id, "Reservation checked in");
        Ok(())
    }

    /// Complete the visit, sending the table to CLEANING
    pub fn complete(&self, id: i64) -> EngineResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(EngineError::NotFound(id))?;

        if !matches!(
            entry.status,
            ReservationStatus::CheckedIn | ReservationStatus::TimeoutWarning
        ) {
            return Err(EngineError::InvalidState {
                id,
                actual: entry.status,
                required: "CHECKED_IN or TIMEOUT_WARNING",
            });
        }

        if let Some(table_id) = entry.table_id {
            self.registry.mark_cleaning(table_id)?;
        }

        entry.status = ReservationStatus::Completed;
        entry.updated_at = now_millis();

        tracing::info!(reservation_id = id, "Reservation completed");
        Ok(entry.clone())
    }

    /// No-show: absence fee of 10 per guest, table released straight to
    /// AVAILABLE (nobody sat down, no cleaning needed)
    pub fn mark_no_show(&self, id: i64) -> EngineResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(EngineError::NotFound(id))?;

        if entry.status != ReservationStatus::Confirmed {
            return Err(EngineError::InvalidState {
                id,
                actual: entry.status,
                required: "CONFIRMED",
            });
        }

        // Full release to AVAILABLE first; a registry failure aborts the
        // transition so the sweep can log and retry on a later tick
        if let Some(table_id) = entry.table_id {
            self.registry.free(table_id)?;
        }

        let fee = Decimal::from(entry.party_size * 10);
        entry.cancellation_fee = Some(fee);
        entry.status = ReservationStatus::NoShow;
        entry.updated_at = now_millis();

        tracing::info!(reservation_id = id, absence_fee = %fee, "Reservation marked NO_SHOW");
        Ok(entry.clone())
    }

    /// Soft overstay flag; table occupancy is untouched
    pub fn mark_timeout_warning(&self, id: i64) -> EngineResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(EngineError::NotFound(id))?;

        if entry.status != ReservationStatus::CheckedIn {
            return Err(EngineError::InvalidState {
                id,
                actual: entry.status,
                required: "CHECKED_IN",
            });
        }

        entry.status = ReservationStatus::TimeoutWarning;
        entry.updated_at = now_millis();
        tracing::info!(reservation_id = id, "Reservation marked TIMEOUT_WARNING");
        Ok(entry.clone())
    }

    /// Manual table override when auto-assignment at creation failed;
    /// promotes PENDING to CONFIRMED
    pub fn assign_table(&self, id: i64, table_id: i64) -> EngineResult<Reservation> {
        let mut entry = self
            .reservations
            .get_mut(&id)
            .ok_or(EngineError::NotFound(id))?;

        if entry.status.is_terminal() {
            return Err(EngineError::InvalidState {
                id,
                actual: entry.status,
                required: "a non-terminal state",
            });
        }

        self.registry.reserve(table_id, id)?;

        // Release a previously bound table so a reservation never holds two
        if let Some(previous) = entry.table_id
            && previous != table_id
        {
            if let Err(e) = self.registry.free(previous) {
                tracing::warn!(reservation_id = id, table_id = previous, error = %e, "Failed to release previous table");
            }
        }

        entry.table_id = Some(table_id);
        if entry.status == ReservationStatus::Pending {
            entry.status = ReservationStatus::Confirmed;
        }
        entry.updated_at = now_millis();

        tracing::info!(reservation_id = id, table_id, "Table assigned manually");
        Ok(entry.clone())
    }

    /// Administrative delete; a still-held table is released
    pub fn delete(&self, id: i64) -> EngineResult<()> {
        let table_id = {
            let entry = self
                .reservations
                .get(&id)
                .ok_or(EngineError::NotFound(id))?;
            // Terminal reservations released their table already
            (!entry.status.is_terminal())
                .then_some(entry.table_id)
                .flatten()
        };

        if let Some(table_id) = table_id
            && let Err(e) = self.registry.free(table_id)
        {
            tracing::warn!(reservation_id = id, table_id, error = %e, "Failed to free table on delete");
        }

        self.reservations.remove(&id);
        tracing::info!(reservation_id = id, "Reservation deleted");
        Ok(())
    }

    // ========================================================================
    // Sweep queries
    // ========================================================================

    /// CONFIRMED reservations past their grace window with no check-in
    pub fn find_potential_no_shows(&self, now: DateTime<Utc>) -> Vec<Reservation> {
        let cutoff = now - Duration::minutes(NO_SHOW_GRACE_MINUTES);
        self.reservations
            .iter()
            .filter(|r| {
                r.status == ReservationStatus::Confirmed
                    && r.reservation_time < cutoff
                    && r.checked_in_at.is_none()
            })
            .map(|r| r.clone())
            .collect()
    }

    /// CHECKED_IN reservations seated past their expected duration
    pub fn find_timeout_candidates(&self, now: DateTime<Utc>) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| {
                r.status == ReservationStatus::CheckedIn
                    && r.checked_in_at
                        .is_some_and(|t| t < now - Duration::minutes(r.duration_minutes))
            })
            .map(|r| r.clone())
            .collect()
    }

    // ========================================================================
    // Query surface
    // ========================================================================

    pub fn get(&self, id: i64) -> EngineResult<Reservation> {
        self.reservations
            .get(&id)
            .map(|r| r.clone())
            .ok_or(EngineError::NotFound(id))
    }

    pub fn list(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> = self.reservations.iter().map(|r| r.clone()).collect();
        all.sort_by_key(|r| r.created_at);
        all
    }

    pub fn list_by_status(&self, status: ReservationStatus) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.status == status)
            .map(|r| r.clone())
            .collect()
    }

    pub fn list_by_restaurant(&self, restaurant_id: i64) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.restaurant_id == restaurant_id)
            .map(|r| r.clone())
            .collect()
    }

    pub fn list_by_customer(&self, customer_id: i64) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .map(|r| r.clone())
            .collect()
    }

    /// Currently seated reservations (CHECKED_IN or TIMEOUT_WARNING)
    pub fn list_active(&self) -> Vec<Reservation> {
        self.reservations
            .iter()
            .filter(|r| {
                matches!(
                    r.status,
                    ReservationStatus::CheckedIn | ReservationStatus::TimeoutWarning
                )
            })
            .map(|r| r.clone())
            .collect()
    }
}
