//! 预订生命周期巡检
//!
//! Fixed-interval sweep that advances time-driven transitions without any
//! request traffic: CONFIRMED reservations past their grace window become
//! NO_SHOW, seated parties past their expected duration get a
//! TIMEOUT_WARNING. One reservation's failure never aborts the batch; a
//! candidate that raced into an incompatible state is logged and skipped.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::engine::{EngineError, ReservationEngine};

/// Reservation lifecycle sweeper
///
/// Registered as `TaskKind::Periodic` in `start_background_tasks()`.
pub struct ReservationSweeper {
    engine: Arc<ReservationEngine>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ReservationSweeper {
    pub fn new(
        engine: Arc<ReservationEngine>,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            engine,
            interval,
            shutdown,
        }
    }

    /// Main loop: tick every `interval` until shutdown
    pub async fn run(self) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Reservation sweeper started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Reservation sweeper received shutdown signal");
                    return;
                }
            }

            self.tick(Utc::now());
        }
    }

    /// One sweep pass; public so tests can drive it with a fixed clock
    pub fn tick(&self, now: DateTime<Utc>) {
        self.no_show_pass(now);
        self.timeout_pass(now);
    }

    fn no_show_pass(&self, now: DateTime<Utc>) {
        let candidates = self.engine.find_potential_no_shows(now);
        if candidates.is_empty() {
            return;
        }

        tracing::info!(count = candidates.len(), "Found potential no-shows");
        for reservation in candidates {
            match self.engine.mark_no_show(reservation.id) {
                Ok(r) => {
                    tracing::info!(
                        reservation_id = r.id,
                        absence_fee = ?r.cancellation_fee,
                        "No-show applied"
                    );
                }
                // A request beat us to this reservation; skip it and move on
                Err(EngineError::InvalidState { id, actual, .. }) => {
                    tracing::warn!(
                        reservation_id = id,
                        status = %actual,
                        "No-show candidate changed state mid-sweep, skipping"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        reservation_id = reservation.id,
                        error = %e,
                        "Failed to apply no-show, skipping"
                    );
                }
            }
        }
    }

    fn timeout_pass(&self, now: DateTime<Utc>) {
        let candidates = self.engine.find_timeout_candidates(now);
        if candidates.is_empty() {
            return;
        }

        tracing::info!(count = candidates.len(), "Found timeout candidates");
        for reservation in candidates {
            match self.engine.mark_timeout_warning(reservation.id) {
                Ok(_) => {
                    tracing::info!(reservation_id = reservation.id, "Timeout warning applied");
                }
                Err(EngineError::InvalidState { id, actual, .. }) => {
                    tracing::warn!(
                        reservation_id = id,
                        status = %actual,
                        "Timeout candidate changed state mid-sweep, skipping"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        reservation_id = reservation.id,
                        error = %e,
                        "Failed to apply timeout warning, skipping"
                    );
                }
            }
        }
    }
}
