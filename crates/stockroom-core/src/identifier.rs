//! Record identifier generation
//!
//! Identifiers are positive 64-bit integers handed out in strictly
//! increasing order. The generator starts at 0, so the first identifier
//! is 1. Restoring a backup moves the counter to the backup's highest id
//! so that new records always land above every restored one.

use serde::{Deserialize, Serialize};

/// Monotonic identifier counter
///
/// Owned by an [`Inventory`](crate::Inventory), not a static.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    counter: u64,
}

impl IdGenerator {
    /// Create a generator at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator whose next id is `watermark + 1`
    pub fn starting_after(watermark: u64) -> Self {
        Self { counter: watermark }
    }

    /// Advance the counter and return the new identifier
    ///
    /// Returns `None` once the counter is at `u64::MAX`; the counter never
    /// wraps.
    pub fn next_id(&mut self) -> Option<u64> {
        let next = self.counter.checked_add(1)?;
        self.counter = next;
        Some(next)
    }

    /// Set the counter to `id`
    ///
    /// The counter is set, not raised: resetting below the current value
    /// moves it down.
    pub fn reset_watermark(&mut self, id: u64) {
        self.counter = id;
    }

    /// The last identifier handed out (or the watermark last set)
    pub fn watermark(&self) -> u64 {
        self.counter
    }
}
