use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::input::GestureKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Interactions", inline)]
#[serde(default)]
/// Pointer, drag, and wheel behavior.
pub struct InteractionOptions {
    /// Gesture a plain left-button drag performs.
    #[schemars(title = "Primary Interaction")]
    pub primary_interaction: GestureKind,
    /// Movement in CSS pixels before a mouse or pen press becomes a drag.
    #[schemars(title = "Fine Pointer Threshold", range(min = 0.0, max = 20.0), extend("step" = 1.0))]
    pub fine_pointer_threshold: f32,
    /// Movement in CSS pixels before a touch becomes a drag.
    #[schemars(title = "Coarse Pointer Threshold", range(min = 0.0, max = 40.0), extend("step" = 1.0))]
    pub coarse_pointer_threshold: f32,
    /// Wait after a press before movement may start a drag.
    #[schemars(title = "Interaction Delay (ms)", range(min = 0, max = 500))]
    pub interaction_delay_ms: u64,
    /// Quiet period after the last wheel tick that ends a wheel zoom.
    #[schemars(title = "Wheel End Debounce (ms)", range(min = 50, max = 2000))]
    pub mouse_wheel_interaction_end_debounce_ms: u64,
    /// Invert the wheel zoom direction.
    #[schemars(title = "Reverse Wheel")]
    pub reverse_mouse_wheel_direction: bool,
    /// Refuse perspective zoom steps that would end closer than the near
    /// plane.
    #[schemars(title = "Clamp Zoom At Near Plane")]
    pub use_minimum_perspective_zoom_distance: bool,
    /// Twist applied by one keyboard twist action, in degrees.
    #[schemars(title = "Keyboard Twist", range(min = 1.0, max = 90.0), extend("step" = 1.0))]
    pub keyboard_twist_degrees: f32,
}

impl Default for InteractionOptions {
    fn default() -> Self {
        Self {
            primary_interaction: GestureKind::Rotate,
            fine_pointer_threshold: 2.0,
            coarse_pointer_threshold: 4.0,
            interaction_delay_ms: 75,
            mouse_wheel_interaction_end_debounce_ms: 400,
            reverse_mouse_wheel_direction: false,
            use_minimum_perspective_zoom_distance: true,
            keyboard_twist_degrees: 15.0,
        }
    }
}

impl InteractionOptions {
    /// Drag threshold in CSS pixels for the given pointer kind.
    #[must_use]
    pub fn pointer_threshold(&self, is_touch: bool) -> f32 {
        if is_touch {
            self.coarse_pointer_threshold
        } else {
            self.fine_pointer_threshold
        }
    }

    /// [`Self::interaction_delay_ms`] as a duration.
    #[must_use]
    pub fn interaction_delay(&self) -> Duration {
        Duration::from_millis(self.interaction_delay_ms)
    }

    /// [`Self::mouse_wheel_interaction_end_debounce_ms`] as a duration.
    #[must_use]
    pub fn wheel_end_debounce(&self) -> Duration {
        Duration::from_millis(self.mouse_wheel_interaction_end_debounce_ms)
    }
}
