use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Events", inline)]
#[serde(default)]
/// Tap classification timing.
pub struct EventOptions {
    /// Longest gap between two taps that still counts as a double tap.
    #[schemars(title = "Double Tap (ms)", range(min = 100, max = 1000))]
    pub double_tap_threshold_ms: u64,
    /// Hold time before an undragged press becomes a long press.
    #[schemars(title = "Long Press (ms)", range(min = 200, max = 2000))]
    pub long_press_threshold_ms: u64,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            double_tap_threshold_ms: 300,
            long_press_threshold_ms: 500,
        }
    }
}

impl EventOptions {
    /// [`Self::double_tap_threshold_ms`] as a duration.
    #[must_use]
    pub fn double_tap_threshold(&self) -> Duration {
        Duration::from_millis(self.double_tap_threshold_ms)
    }

    /// [`Self::long_press_threshold_ms`] as a duration.
    #[must_use]
    pub fn long_press_threshold(&self) -> Duration {
        Duration::from_millis(self.long_press_threshold_ms)
    }
}
