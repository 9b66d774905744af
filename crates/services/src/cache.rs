use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A read-shared cached aggregate.
///
/// Writers invalidate rather than mutate: after `invalidate` (or once the
/// staleness window passes) the next reader sees `None` and must re-fetch.
/// Timestamps come from the caller's clock so staleness stays deterministic
/// in tests.
pub struct Cached<T> {
    stale_after: Duration,
    slot: Mutex<Option<Entry<T>>>,
}

struct Entry<T> {
    value: T,
    fetched_at: DateTime<Utc>,
}

impl<T: Clone> Cached<T> {
    #[must_use]
    pub fn new(stale_after: Duration) -> Self {
        Self {
            stale_after,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value while it is present and fresh at `now`.
    #[must_use]
    pub fn get(&self, now: DateTime<Utc>) -> Option<T> {
        let slot = self.lock();
        let entry = slot.as_ref()?;
        if now - entry.fetched_at >= self.stale_after {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn put(&self, value: T, now: DateTime<Utc>) {
        *self.lock() = Some(Entry {
            value,
            fetched_at: now,
        });
    }

    /// Clears the slot. Invalidating an already-empty slot is a no-op, so
    /// redundant invalidations are safe.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Entry<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
