//! Content-addressed artifact cache
//!
//! Caches generated badge artifacts keyed by `(scope, name, version,
//! generator)`. Entries never expire on a timer: a new package version
//! derives a new key, so stale entries become orphans that the integrity
//! sweep reclaims.
//!
//! # Sweep model
//!
//! | Operation  | Sweep? | Why |
//! |------------|--------|-----|
//! | read/write | never  | hot path stays cheap |
//! | delete_one | gated  | a forced regeneration hints at inconsistency |
//! | verify     | always | explicit integrity pass |
//!
//! The gate opens when more than [`gc::SWEEP_INTERVAL`] has passed since
//! the last completed sweep; the clock is per-store and resets on restart.

pub mod content;
pub mod gc;
pub mod key;

pub use content::{ContentStore, StoreConfig, SweepReport};
pub use gc::{should_sweep_now, GcClock, SWEEP_INTERVAL};
pub use key::derive_key;
