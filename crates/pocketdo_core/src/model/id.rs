//! Timestamp-derived id issuing.
//!
//! # Invariants
//! - Issued ids are strictly increasing for one clock instance.
//! - An id observed from persisted data is never issued again.

use chrono::Utc;

/// Issues monotonically increasing ids derived from epoch milliseconds.
///
/// Two creates inside the same millisecond still receive distinct ids: the
/// clock bumps past the last issued value instead of repeating it.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the clock from already persisted ids.
    pub fn seeded(ids: impl IntoIterator<Item = i64>) -> Self {
        let mut clock = Self::new();
        for id in ids {
            clock.observe(id);
        }
        clock
    }

    /// Records an externally assigned id so it is never issued again.
    pub fn observe(&mut self, id: i64) {
        self.last = self.last.max(id);
    }

    /// Returns the next id using the current wall clock.
    pub fn next_id(&mut self) -> i64 {
        self.next_id_at(Utc::now().timestamp_millis())
    }

    /// Returns the next id for an explicit millisecond timestamp.
    pub fn next_id_at(&mut self, now_ms: i64) -> i64 {
        let id = if now_ms > self.last {
            now_ms
        } else {
            self.last.saturating_add(1)
        };
        self.last = id;
        id
    }

    /// Highest id issued or observed so far (`0` when fresh).
    pub fn last_issued(&self) -> i64 {
        self.last
    }
}
