//! Input handling: event types, gesture primitives, and the state machines
//! that turn raw pointer, wheel, and key events into camera interactions.

/// Platform-agnostic input events.
pub mod event;
/// Gesture primitives with a shared begin/drag/end contract.
pub mod gestures;
/// Single-pointer state machine.
pub mod handler;
/// Keyboard camera actions.
pub mod keyboard;
/// Tap and double-tap recognition.
pub mod tap;
/// Two-point touch arbitration.
pub mod touch;

pub use event::{
    DeltaMode, InputEvent, Modifiers, MouseButton, PointerId, PointerSample,
    PointerType, WheelSample,
};
pub use gestures::{
    GestureKind, Gestures, MouseInteraction, PanInteraction,
    PivotInteraction, RotateInteraction, RotatePointInteraction,
    TwistInteraction, ZoomInteraction,
};
pub use handler::BaseInteractionHandler;
pub use keyboard::KeyAction;
pub use tap::{TapKind, TapTracker};
pub use touch::TouchInteractionHandler;
