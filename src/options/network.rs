use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Network", inline)]
#[serde(default)]
/// Render request limits.
pub struct NetworkOptions {
    /// How long a camera render may wait for its frame.
    #[schemars(title = "Render Timeout (ms)", range(min = 1000, max = 60000))]
    pub render_timeout_ms: u64,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            render_timeout_ms: 15_000,
        }
    }
}

impl NetworkOptions {
    /// [`Self::render_timeout_ms`] as a duration.
    #[must_use]
    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}
