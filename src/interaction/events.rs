use glam::Vec2;

use crate::input::{Modifiers, MouseButton, PointerType};

/// Where and how a tap landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapDetails {
    /// Canvas-local position.
    pub position: Vec2,
    /// Button that tapped.
    pub button: MouseButton,
    /// Pointer kind.
    pub pointer_type: PointerType,
    /// Modifier keys held at release.
    pub modifiers: Modifiers,
}

/// Notification for the host application, drained with
/// [`StreamInteractionApi::drain_events`](super::StreamInteractionApi::drain_events).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    /// An interaction bracket opened.
    InteractionStarted,
    /// The interaction bracket closed.
    InteractionFinished,
    /// Press and release without a drag.
    Tap(TapDetails),
    /// Second tap close in time and space to the first.
    DoubleTap(TapDetails),
    /// Press held without a drag.
    LongPress(TapDetails),
}
