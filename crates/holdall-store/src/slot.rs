//! The shared last-error slot.
//!
//! The slot is a diagnostic side-channel, not the primary error path: every
//! operation reports its own failure through its return value, and the slot
//! additionally remembers the most recent failure for after-the-fact
//! inspection. It is never cleared by a successful operation.

use arc_swap::ArcSwapOption;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::error::StoreError;

/// A failure recorded in the last-error slot.
#[derive(Debug, Clone)]
pub struct LastError {
    /// The failure itself.
    pub error: StoreError,
    /// When the failure was recorded.
    pub recorded_at: OffsetDateTime,
}

/// Lock-free cell holding the most recent failure.
///
/// Each write atomically replaces the previous value, so readers never see a
/// torn entry. There is no ordering guarantee between concurrent writers:
/// the slot keeps whichever write lands last, which is why callers that need
/// per-call attribution must use the call's own `Result`.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    current: ArcSwapOption<LastError>,
}

impl ErrorSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure, replacing any previously recorded one.
    pub fn record(&self, error: &StoreError) {
        self.current.store(Some(Arc::new(LastError {
            error: error.clone(),
            recorded_at: OffsetDateTime::now_utc(),
        })));
    }

    /// The most recent failure, or `None` if no operation has failed yet.
    #[must_use]
    pub fn last(&self) -> Option<LastError> {
        self.current.load_full().map(|entry| (*entry).clone())
    }
}
