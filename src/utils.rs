//! Small shared utilities: wall-clock access and identifier generation.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Returns the current wall-clock time in milliseconds since the Unix epoch.
///
/// This is the default time source for [`crate::OrderBook`]; a different
/// source can be injected through [`crate::OrderBook::with_clock`].
#[must_use]
pub fn current_time_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Deterministic UUID factory.
///
/// Generates a sequence of version-5 UUIDs under a namespace, so every
/// engine instance produces unique but reproducible identifiers: two
/// factories built from the same namespace yield the same sequence. A book
/// created with [`crate::OrderBook::new`] uses a random (v4) namespace.
#[derive(Debug, Clone)]
pub struct UuidFactory {
    namespace: Uuid,
    counter: u64,
}

impl UuidFactory {
    /// Creates a factory that generates v5 UUIDs under the given namespace.
    #[must_use]
    pub fn new(namespace: Uuid) -> Self {
        Self {
            namespace,
            counter: 0,
        }
    }

    /// Creates a factory with a random namespace.
    #[must_use]
    pub fn random() -> Self {
        Self::new(Uuid::new_v4())
    }

    /// Returns the next UUID in the sequence.
    pub fn next_uuid(&mut self) -> Uuid {
        self.counter += 1;
        Uuid::new_v5(&self.namespace, &self.counter.to_be_bytes())
    }
}

impl Default for UuidFactory {
    fn default() -> Self {
        Self::random()
    }
}

/// Millisecond clock that never repeats a stamp.
///
/// Wraps a caller-supplied time source and returns
/// `max(source(), last + 1)`, so every stamp handed out by one engine is
/// strictly greater than the previous one even when the source has coarse
/// resolution. Resting orders only ever join the tail of a level, which
/// combined with strict stamps keeps timestamps nondecreasing along every
/// level's queue.
#[derive(Debug, Clone)]
pub(crate) struct MonotonicClock {
    source: fn() -> u64,
    last: u64,
}

impl MonotonicClock {
    pub(crate) fn new(source: fn() -> u64) -> Self {
        Self { source, last: 0 }
    }

    /// Returns a fresh, strictly increasing millisecond stamp.
    pub(crate) fn next(&mut self) -> u64 {
        let now = (self.source)();
        self.last = now.max(self.last + 1);
        self.last
    }

    pub(crate) fn reset(&mut self) {
        self.last = 0;
    }
}
