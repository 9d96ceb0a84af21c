use web_time::Duration;

/// Round-trip latency from a camera request to its matching frame.
///
/// Keeps the latest sample and an exponential moving average so a single
/// slow frame does not swing the reported latency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTripTiming {
    last: Option<Duration>,
    smoothed: Option<Duration>,
    /// Weight of each new sample (0.0-1.0)
    smoothing: f64,
    samples: u64,
}

impl Default for RoundTripTiming {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl RoundTripTiming {
    /// Timing tracker weighting each new sample by `smoothing`.
    #[must_use]
    pub fn new(smoothing: f64) -> Self {
        Self {
            last: None,
            smoothed: None,
            smoothing: smoothing.clamp(0.0, 1.0),
            samples: 0,
        }
    }

    /// Fold in one measured round trip.
    pub fn record(&mut self, round_trip: Duration) {
        self.last = Some(round_trip);
        self.samples += 1;
        self.smoothed = Some(match self.smoothed {
            // First sample seeds the average directly
            None => round_trip,
            Some(prev) => Duration::from_secs_f64(
                prev.as_secs_f64() * (1.0 - self.smoothing)
                    + round_trip.as_secs_f64() * self.smoothing,
            ),
        });
    }

    /// Most recent round trip.
    #[must_use]
    pub fn last(&self) -> Option<Duration> {
        self.last
    }

    /// Smoothed round trip.
    #[must_use]
    pub fn smoothed(&self) -> Option<Duration> {
        self.smoothed
    }

    /// Number of samples recorded.
    #[must_use]
    pub fn samples(&self) -> u64 {
        self.samples
    }
}
