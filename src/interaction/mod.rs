//! The interaction façade gestures and input handlers drive.
//!
//! [`InteractionApi`] owns the interaction bracket: a camera snapshot taken
//! at [`begin_interaction`](InteractionApi::begin_interaction), transformed
//! tick by tick, and dropped together with every gesture anchor at
//! [`end_interaction`](InteractionApi::end_interaction). Camera methods
//! called outside a bracket do nothing.

mod anchors;
mod api;
/// Priority-ordered cursor stack.
pub mod cursor;
mod events;
#[cfg(test)]
pub(crate) mod recording;

use glam::Vec2;

pub use anchors::{Anchors, PanData, ZoomData};
pub use api::StreamInteractionApi;
pub use cursor::{Cursor, CursorHandle, CursorManager, CursorPriority};
pub use events::{TapDetails, ViewerEvent};

use crate::options::Options;

/// Camera interaction operations available to gestures.
///
/// Points are canvas-local logical pixels; deltas are pixel differences
/// between consecutive ticks.
pub trait InteractionApi {
    /// Options in effect right now.
    fn options(&self) -> Options;

    /// Open the bracket. Does nothing if one is already open.
    fn begin_interaction(&mut self);

    /// Close the bracket and drop all anchors. Does nothing if none is
    /// open.
    fn end_interaction(&mut self);

    /// Whether a bracket is open.
    fn is_interacting(&self) -> bool;

    /// Orbit about the look-at point.
    fn rotate_camera(&mut self, delta: Vec2);

    /// Orbit about the geometry under `point`.
    fn rotate_camera_at_point(&mut self, delta: Vec2, point: Vec2);

    /// Turn the view about the eye.
    fn pivot_camera(&mut self, delta: Vec2);

    /// Slide parallel to the screen.
    fn pan_camera_by_delta(&mut self, delta: Vec2);

    /// Keep the grabbed world point under `point`.
    fn pan_camera_to_screen_point(&mut self, point: Vec2);

    /// Dolly along the view direction.
    fn zoom_camera(&mut self, delta: f32);

    /// Dolly toward the world point under `point`.
    fn zoom_camera_to_point(&mut self, point: Vec2, delta: f32);

    /// Roll by a fixed angle in degrees.
    fn twist_camera(&mut self, degrees: f32);

    /// Roll by the cursor's angular motion about the viewport center.
    fn twist_camera_to_point(&mut self, point: Vec2);

    /// Forget the twist baseline; call when a twist gesture starts.
    fn reset_last_angle(&mut self);

    /// Forget every gesture anchor but keep the bracket open; call when
    /// one gesture hands over to another mid-drag.
    fn reset_anchors(&mut self);

    /// Frame the whole scene. Allowed with or without a bracket.
    fn view_all(&mut self);

    /// Movement in pixels that turns a press into a drag.
    fn pixel_threshold(&self, is_touch: bool) -> f32;

    /// Report a tap.
    fn tap(&mut self, details: TapDetails);

    /// Report a double tap.
    fn double_tap(&mut self, details: TapDetails);

    /// Report a long press.
    fn long_press(&mut self, details: TapDetails);

    /// Push a cursor onto the cursor stack.
    fn add_cursor(
        &mut self,
        cursor: Cursor,
        priority: CursorPriority,
    ) -> CursorHandle;

    /// Remove a cursor pushed with [`add_cursor`](Self::add_cursor).
    fn remove_cursor(&mut self, handle: CursorHandle);

    /// Cursor the host element should show now.
    fn current_cursor(&self) -> Cursor;
}
