use glam::Vec2;
use web_time::{Duration, Instant};

/// Result of classifying a completed tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapKind {
    /// First tap, or one too far from the previous in time or space.
    Single,
    /// Second tap close to the first.
    Double,
}

/// Tracks the previous tap to recognize double taps.
#[derive(Debug, Clone, Copy, Default)]
pub struct TapTracker {
    last: Option<(Instant, Vec2)>,
}

impl TapTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a tap at `position`.
    ///
    /// A double tap consumes the pair, so a third quick tap starts over as
    /// a single.
    pub fn register(
        &mut self,
        position: Vec2,
        now: Instant,
        window: Duration,
        radius: f32,
    ) -> TapKind {
        let is_double = self.last.is_some_and(|(at, last_position)| {
            now.saturating_duration_since(at) <= window
                && last_position.distance(position) <= radius
        });
        if is_double {
            self.last = None;
            TapKind::Double
        } else {
            self.last = Some((now, position));
            TapKind::Single
        }
    }

    /// Forget the previous tap (e.g. after a drag).
    pub fn reset(&mut self) {
        self.last = None;
    }
}
