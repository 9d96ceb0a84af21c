use serde::{Deserialize, Serialize};

/// Camera actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// view_all = "KeyF"
/// twist_clockwise = "KeyE"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Frame the whole scene.
    ViewAll,
    /// Roll the scene clockwise by the configured step.
    TwistClockwise,
    /// Roll the scene counter-clockwise by the configured step.
    TwistCounterClockwise,
}
