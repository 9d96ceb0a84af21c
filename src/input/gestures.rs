//! Gesture primitives: one stateful strategy per drag gesture.
//!
//! A primitive records the pointer position while its gesture runs. That
//! private position, not the shared interacting flag, decides whether
//! [`MouseInteraction::begin_drag`] opens a bracket, so a duplicate down
//! event is harmless and a hand-over between gestures never re-begins.

use glam::Vec2;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use super::event::PointerSample;
use crate::interaction::{Cursor, InteractionApi};
use crate::util::timer::Deadline;
use crate::viewport::ElementBounds;

/// Drag gesture kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Orbit about the look-at point.
    #[default]
    Rotate,
    /// Orbit about the geometry under the press.
    RotatePoint,
    /// Drag the scene along the screen.
    Pan,
    /// Dolly toward the press point.
    Zoom,
    /// Roll about the view axis.
    Twist,
    /// Turn the view about the eye.
    Pivot,
}

impl GestureKind {
    /// Every gesture kind.
    pub const ALL: [Self; 6] = [
        Self::Rotate,
        Self::RotatePoint,
        Self::Pan,
        Self::Zoom,
        Self::Twist,
        Self::Pivot,
    ];

    /// Cursor shown while the gesture drags.
    #[must_use]
    pub fn cursor(self) -> Cursor {
        match self {
            Self::Pan => Cursor::Move,
            Self::Zoom => Cursor::ZoomIn,
            Self::Rotate | Self::RotatePoint | Self::Twist | Self::Pivot => {
                Cursor::Grabbing
            }
        }
    }
}

/// Begin/drag/end contract shared by every gesture primitive.
pub trait MouseInteraction {
    /// Which gesture this is.
    fn kind(&self) -> GestureKind;

    /// Start the gesture at `sample` unless it is already running.
    ///
    /// `canvas_point` is the press in canvas coordinates; `element` is
    /// queried once here for gestures that need canvas positions later.
    fn begin_drag(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        api: &mut dyn InteractionApi,
        element: Option<&dyn ElementBounds>,
    );

    /// Apply the movement since the previous tick. No-op when not running.
    fn drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi);

    /// Finish the gesture and close the bracket. No-op when not running.
    fn end_drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi);

    /// Stop tracking without closing the bracket; used when another
    /// gesture takes over the same drag.
    fn cancel(&mut self);

    /// Whether the gesture is running.
    fn is_dragging(&self) -> bool;
}

/// Position bookkeeping common to all primitives.
#[derive(Debug, Clone, Copy, Default)]
struct Track {
    current: Option<Vec2>,
    /// Client position of the canvas origin, fixed at begin.
    origin: Vec2,
    /// Canvas point of the press.
    anchor: Vec2,
}

impl Track {
    /// Returns `false` if already tracking.
    fn begin(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        element: Option<&dyn ElementBounds>,
    ) -> bool {
        if self.current.is_some() {
            return false;
        }
        self.current = Some(sample.position);
        self.origin = element.map_or(sample.position - canvas_point, |e| {
            e.bounding_rect().origin()
        });
        self.anchor = canvas_point;
        true
    }

    /// Movement since the previous tick, or `None` when not tracking.
    fn advance(&mut self, sample: &PointerSample) -> Option<Vec2> {
        let previous = self.current.replace(sample.position)?;
        Some(sample.position - previous)
    }

    fn canvas(&self, sample: &PointerSample) -> Vec2 {
        sample.position - self.origin
    }

    fn end(&mut self) -> bool {
        self.current.take().is_some()
    }
}

macro_rules! tracked_gesture {
    ($kind:expr) => {
        fn kind(&self) -> GestureKind {
            $kind
        }

        fn cancel(&mut self) {
            self.track.current = None;
        }

        fn is_dragging(&self) -> bool {
            self.track.current.is_some()
        }
    };
}

/// Orbit drag.
#[derive(Debug, Default)]
pub struct RotateInteraction {
    track: Track,
}

impl MouseInteraction for RotateInteraction {
    tracked_gesture!(GestureKind::Rotate);

    fn begin_drag(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        api: &mut dyn InteractionApi,
        _element: Option<&dyn ElementBounds>,
    ) {
        if self.track.begin(sample, canvas_point, None) {
            api.begin_interaction();
        }
    }

    fn drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi) {
        match self.track.advance(sample) {
            Some(delta) if delta != Vec2::ZERO => api.rotate_camera(delta),
            _ => {}
        }
    }

    fn end_drag(&mut self, _sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.end() {
            api.end_interaction();
        }
    }
}

/// Orbit about the geometry under the press.
#[derive(Debug, Default)]
pub struct RotatePointInteraction {
    track: Track,
}

impl MouseInteraction for RotatePointInteraction {
    tracked_gesture!(GestureKind::RotatePoint);

    fn begin_drag(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        api: &mut dyn InteractionApi,
        _element: Option<&dyn ElementBounds>,
    ) {
        if self.track.begin(sample, canvas_point, None) {
            api.begin_interaction();
        }
    }

    fn drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi) {
        match self.track.advance(sample) {
            Some(delta) if delta != Vec2::ZERO => {
                api.rotate_camera_at_point(delta, self.track.anchor);
            }
            _ => {}
        }
    }

    fn end_drag(&mut self, _sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.end() {
            api.end_interaction();
        }
    }
}

/// Grab-and-drag pan.
#[derive(Debug, Default)]
pub struct PanInteraction {
    track: Track,
}

impl MouseInteraction for PanInteraction {
    tracked_gesture!(GestureKind::Pan);

    fn begin_drag(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        api: &mut dyn InteractionApi,
        element: Option<&dyn ElementBounds>,
    ) {
        if self.track.begin(sample, canvas_point, element) {
            api.begin_interaction();
        }
    }

    fn drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.advance(sample).is_some() {
            api.pan_camera_to_screen_point(self.track.canvas(sample));
        }
    }

    fn end_drag(&mut self, _sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.end() {
            api.end_interaction();
        }
    }
}

/// Vertical-drag zoom toward the press point, plus wheel zoom.
///
/// Wheel ticks form one logical gesture: the first opens a bracket if none
/// is open, and the bracket closes once no tick has arrived for the
/// configured debounce.
#[derive(Debug, Default)]
pub struct ZoomInteraction {
    track: Track,
    wheel_end: Option<Deadline>,
    /// Whether the wheel, not a drag, opened the current bracket.
    wheel_owns_bracket: bool,
}

impl ZoomInteraction {
    /// Apply one wheel step at a canvas point.
    pub fn zoom(
        &mut self,
        point: Vec2,
        delta: f32,
        api: &mut dyn InteractionApi,
        now: Instant,
    ) {
        if !api.is_interacting() {
            log::debug!("wheel zoom started");
            api.begin_interaction();
            self.wheel_owns_bracket = true;
        }
        api.zoom_camera_to_point(point, delta);
        let debounce = api.options().interactions.wheel_end_debounce();
        self.wheel_end = Some(Deadline::after(now, debounce));
    }

    /// Close the wheel bracket once the debounce has passed, unless a drag
    /// is still using it.
    pub fn end_wheel_if_due(
        &mut self,
        now: Instant,
        drag_active: bool,
        api: &mut dyn InteractionApi,
    ) {
        if !self.wheel_end.is_some_and(|d| d.is_due(now)) {
            return;
        }
        self.wheel_end = None;
        if self.wheel_owns_bracket && !drag_active {
            log::debug!("wheel zoom finished");
            api.end_interaction();
        }
        self.wheel_owns_bracket = false;
    }

    /// Drop the wheel session. Returns whether it owned an open bracket.
    pub fn cancel_wheel(&mut self) -> bool {
        let owned = self.wheel_end.take().is_some() && self.wheel_owns_bracket;
        self.wheel_owns_bracket = false;
        owned
    }

    /// When the wheel session ends, if one is running.
    #[must_use]
    pub fn wheel_deadline(&self) -> Option<Deadline> {
        self.wheel_end
    }
}

impl MouseInteraction for ZoomInteraction {
    tracked_gesture!(GestureKind::Zoom);

    fn begin_drag(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        api: &mut dyn InteractionApi,
        element: Option<&dyn ElementBounds>,
    ) {
        if self.track.begin(sample, canvas_point, element) {
            api.begin_interaction();
            // The drag now shares the bracket; its end closes it.
            self.wheel_owns_bracket = false;
        }
    }

    fn drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi) {
        match self.track.advance(sample) {
            // Dragging up zooms in.
            Some(delta) if delta.y != 0.0 => {
                api.zoom_camera_to_point(self.track.anchor, -delta.y);
            }
            _ => {}
        }
    }

    fn end_drag(&mut self, _sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.end() {
            if self.wheel_end.is_some() {
                // The wheel debounce closes the bracket.
                self.wheel_owns_bracket = true;
            } else {
                api.end_interaction();
            }
        }
    }
}

/// Roll by circling the viewport center.
#[derive(Debug, Default)]
pub struct TwistInteraction {
    track: Track,
}

impl MouseInteraction for TwistInteraction {
    tracked_gesture!(GestureKind::Twist);

    fn begin_drag(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        api: &mut dyn InteractionApi,
        element: Option<&dyn ElementBounds>,
    ) {
        if self.track.begin(sample, canvas_point, element) {
            api.begin_interaction();
            api.reset_last_angle();
        }
    }

    fn drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.advance(sample).is_some() {
            api.twist_camera_to_point(self.track.canvas(sample));
        }
    }

    fn end_drag(&mut self, _sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.end() {
            api.end_interaction();
        }
    }
}

/// First-person look drag.
#[derive(Debug, Default)]
pub struct PivotInteraction {
    track: Track,
}

impl MouseInteraction for PivotInteraction {
    tracked_gesture!(GestureKind::Pivot);

    fn begin_drag(
        &mut self,
        sample: &PointerSample,
        canvas_point: Vec2,
        api: &mut dyn InteractionApi,
        _element: Option<&dyn ElementBounds>,
    ) {
        if self.track.begin(sample, canvas_point, None) {
            api.begin_interaction();
        }
    }

    fn drag(&mut self, sample: &PointerSample, api: &mut dyn InteractionApi) {
        match self.track.advance(sample) {
            Some(delta) if delta != Vec2::ZERO => api.pivot_camera(delta),
            _ => {}
        }
    }

    fn end_drag(&mut self, _sample: &PointerSample, api: &mut dyn InteractionApi) {
        if self.track.end() {
            api.end_interaction();
        }
    }
}

/// One instance of every primitive, looked up by [`GestureKind`].
#[derive(Debug, Default)]
pub struct Gestures {
    rotate: RotateInteraction,
    rotate_point: RotatePointInteraction,
    pan: PanInteraction,
    zoom: ZoomInteraction,
    twist: TwistInteraction,
    pivot: PivotInteraction,
}

impl Gestures {
    /// Fresh primitives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Primitive for `kind`.
    #[must_use]
    pub fn get(&self, kind: GestureKind) -> &dyn MouseInteraction {
        match kind {
            GestureKind::Rotate => &self.rotate,
            GestureKind::RotatePoint => &self.rotate_point,
            GestureKind::Pan => &self.pan,
            GestureKind::Zoom => &self.zoom,
            GestureKind::Twist => &self.twist,
            GestureKind::Pivot => &self.pivot,
        }
    }

    /// Mutable primitive for `kind`.
    pub fn get_mut(&mut self, kind: GestureKind) -> &mut dyn MouseInteraction {
        match kind {
            GestureKind::Rotate => &mut self.rotate,
            GestureKind::RotatePoint => &mut self.rotate_point,
            GestureKind::Pan => &mut self.pan,
            GestureKind::Zoom => &mut self.zoom,
            GestureKind::Twist => &mut self.twist,
            GestureKind::Pivot => &mut self.pivot,
        }
    }

    /// The zoom primitive, for wheel input.
    pub fn zoom_mut(&mut self) -> &mut ZoomInteraction {
        &mut self.zoom
    }

    /// The zoom primitive.
    #[must_use]
    pub fn zoom(&self) -> &ZoomInteraction {
        &self.zoom
    }

    /// Whether any primitive is mid-drag.
    #[must_use]
    pub fn any_dragging(&self) -> bool {
        GestureKind::ALL
            .iter()
            .any(|kind| self.get(*kind).is_dragging())
    }
}
