//! Deadline timers driven by an explicit clock.
//!
//! Every debounce in the interaction core (interaction delay, long press,
//! wheel smoothing, wheel session end) is expressed as a [`Deadline`] or a
//! [`TimerQueue`] entry and fired from a `tick(now)` call. Only
//! [`SystemClock`] reads the wall clock; tests use [`ManualClock`] to step
//! time deterministically.

use std::cell::Cell;
use std::rc::Rc;

use web_time::{Duration, Instant};

/// Source of the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall clock (`performance.now()` on wasm).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl ManualClock {
    /// Clock frozen at `start`.
    #[must_use]
    pub fn new(start: Instant) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to `now`.
    pub fn set(&self, now: Instant) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// A point in time after which something should happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `duration` after `now`.
    #[must_use]
    pub fn after(now: Instant, duration: Duration) -> Self {
        Self { at: now + duration }
    }

    /// The instant this deadline expires.
    #[must_use]
    pub fn at(&self) -> Instant {
        self.at
    }

    /// Whether the deadline has passed at `now`.
    #[inline]
    #[must_use]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.at
    }

    /// Time left until expiry (zero once due).
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.at.saturating_duration_since(now)
    }
}

/// Ordered queue of scheduled items with cancel semantics.
///
/// Items scheduled for the same instant fire in insertion order.
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    entries: Vec<(Instant, u64, T)>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Schedule `item` to fire at `at`.
    pub fn schedule(&mut self, at: Instant, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let index = self
            .entries
            .partition_point(|(when, s, _)| (*when, *s) <= (at, seq));
        self.entries.insert(index, (at, seq, item));
    }

    /// Remove and return every item due at `now`, earliest first.
    pub fn drain_due(&mut self, now: Instant) -> Vec<T> {
        let due = self.entries.partition_point(|(when, _, _)| *when <= now);
        self.entries.drain(..due).map(|(_, _, item)| item).collect()
    }

    /// Earliest pending fire time.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.entries.first().map(|(when, _, _)| *when)
    }

    /// Drop every pending item.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let start = clock.now();
        let shared = clock.clone();
        shared.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), start + Duration::from_millis(16));
        clock.set(start);
        assert_eq!(shared.now(), start);
    }

    #[test]
    fn deadline_is_due_at_and_after_expiry() {
        let start = Instant::now();
        let deadline = Deadline::after(start, Duration::from_millis(75));
        assert!(!deadline.is_due(start));
        assert!(!deadline.is_due(start + Duration::from_millis(74)));
        assert!(deadline.is_due(start + Duration::from_millis(75)));
        assert_eq!(
            deadline.remaining(start + Duration::from_millis(25)),
            Duration::from_millis(50)
        );
        assert_eq!(
            deadline.remaining(start + Duration::from_secs(1)),
            Duration::ZERO
        );
    }

    #[test]
    fn queue_fires_in_time_then_insertion_order() {
        let start = Instant::now();
        let mut queue = TimerQueue::new();
        queue.schedule(start + Duration::from_millis(4), "c");
        queue.schedule(start, "a");
        queue.schedule(start, "b");
        queue.schedule(start + Duration::from_millis(8), "d");

        assert_eq!(queue.drain_due(start), vec!["a", "b"]);
        assert_eq!(queue.next_due(), Some(start + Duration::from_millis(4)));
        assert_eq!(
            queue.drain_due(start + Duration::from_millis(5)),
            vec!["c"]
        );
        assert_eq!(queue.len(), 1);
        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.drain_due(start + Duration::from_secs(1)).is_empty());
    }
}
