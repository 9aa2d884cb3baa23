//! Sweep scheduling
//!
//! Integrity sweeps piggyback on deletions: a deletion is a forced
//! regeneration, which is the strongest hint the store's consistency is
//! in question. Reads and writes never trigger a sweep.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

/// Minimum wall-clock gap between integrity sweeps.
pub const SWEEP_INTERVAL: Duration = Duration::hours(1);

/// Whether enough time has passed since the last sweep to run another.
pub fn should_sweep_now(last_sweep_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_sweep_at > SWEEP_INTERVAL
}

/// Tracks when the owning store last completed an integrity sweep.
///
/// Not persisted: a fresh process starts at the Unix epoch, so the first
/// deletion after startup always sweeps.
#[derive(Debug)]
pub struct GcClock {
    last_sweep_at: Mutex<DateTime<Utc>>,
}

impl GcClock {
    pub fn new() -> Self {
        Self {
            last_sweep_at: Mutex::new(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    /// Timestamp of the last completed sweep.
    pub fn last_sweep_at(&self) -> DateTime<Utc> {
        *self.last_sweep_at.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record a completed sweep. Only ever moves forward.
    pub fn mark_swept(&self, at: DateTime<Utc>) {
        let mut last = self.last_sweep_at.lock().unwrap_or_else(|e| e.into_inner());
        if at > *last {
            *last = at;
        }
    }

    /// Whether a sweep is due right now.
    pub fn sweep_due(&self, now: DateTime<Utc>) -> bool {
        should_sweep_now(self.last_sweep_at(), now)
    }
}

impl Default for GcClock {
    fn default() -> Self {
        Self::new()
    }
}
