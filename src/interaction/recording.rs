//! Test double that records every `InteractionApi` call.

use glam::Vec2;

use super::{Cursor, CursorHandle, CursorManager, CursorPriority, InteractionApi, TapDetails};
use crate::options::Options;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Begin,
    End,
    Rotate(Vec2),
    RotateAtPoint(Vec2, Vec2),
    Pivot(Vec2),
    PanByDelta(Vec2),
    PanToPoint(Vec2),
    Zoom(f32),
    ZoomToPoint(Vec2, f32),
    Twist(f32),
    TwistToPoint(Vec2),
    ResetLastAngle,
    ResetAnchors,
    ViewAll,
    Tap(TapDetails),
    DoubleTap(TapDetails),
    LongPress(TapDetails),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingApi {
    pub(crate) calls: Vec<Call>,
    pub(crate) options: Options,
    pub(crate) threshold: Option<f32>,
    pub(crate) interacting: bool,
    /// Brackets actually opened, as the stream would see them.
    pub(crate) opened: usize,
    pub(crate) closed: usize,
    pub(crate) cursors: CursorManager,
}

impl RecordingApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::default()
        }
    }

    pub(crate) fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    /// Camera calls only, without bracket bookkeeping.
    pub(crate) fn camera_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, Call::Begin | Call::End | Call::ResetLastAngle | Call::ResetAnchors))
            .cloned()
            .collect()
    }

    pub(crate) fn zoom_deltas(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::ZoomToPoint(_, d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.calls.clear();
    }
}

impl InteractionApi for RecordingApi {
    fn options(&self) -> Options {
        self.options.clone()
    }

    fn begin_interaction(&mut self) {
        self.calls.push(Call::Begin);
        if !self.interacting {
            self.interacting = true;
            self.opened += 1;
        }
    }

    fn end_interaction(&mut self) {
        self.calls.push(Call::End);
        if self.interacting {
            self.interacting = false;
            self.closed += 1;
        }
    }

    fn is_interacting(&self) -> bool {
        self.interacting
    }

    fn rotate_camera(&mut self, delta: Vec2) {
        self.calls.push(Call::Rotate(delta));
    }

    fn rotate_camera_at_point(&mut self, delta: Vec2, point: Vec2) {
        self.calls.push(Call::RotateAtPoint(delta, point));
    }

    fn pivot_camera(&mut self, delta: Vec2) {
        self.calls.push(Call::Pivot(delta));
    }

    fn pan_camera_by_delta(&mut self, delta: Vec2) {
        self.calls.push(Call::PanByDelta(delta));
    }

    fn pan_camera_to_screen_point(&mut self, point: Vec2) {
        self.calls.push(Call::PanToPoint(point));
    }

    fn zoom_camera(&mut self, delta: f32) {
        self.calls.push(Call::Zoom(delta));
    }

    fn zoom_camera_to_point(&mut self, point: Vec2, delta: f32) {
        self.calls.push(Call::ZoomToPoint(point, delta));
    }

    fn twist_camera(&mut self, degrees: f32) {
        self.calls.push(Call::Twist(degrees));
    }

    fn twist_camera_to_point(&mut self, point: Vec2) {
        self.calls.push(Call::TwistToPoint(point));
    }

    fn reset_last_angle(&mut self) {
        self.calls.push(Call::ResetLastAngle);
    }

    fn reset_anchors(&mut self) {
        self.calls.push(Call::ResetAnchors);
    }

    fn view_all(&mut self) {
        self.calls.push(Call::ViewAll);
    }

    fn pixel_threshold(&self, is_touch: bool) -> f32 {
        self.threshold
            .unwrap_or_else(|| self.options.interactions.pointer_threshold(is_touch))
    }

    fn tap(&mut self, details: TapDetails) {
        self.calls.push(Call::Tap(details));
    }

    fn double_tap(&mut self, details: TapDetails) {
        self.calls.push(Call::DoubleTap(details));
    }

    fn long_press(&mut self, details: TapDetails) {
        self.calls.push(Call::LongPress(details));
    }

    fn add_cursor(&mut self, cursor: Cursor, priority: CursorPriority) -> CursorHandle {
        self.cursors.add(cursor, priority)
    }

    fn remove_cursor(&mut self, handle: CursorHandle) {
        let _ = self.cursors.remove(handle);
    }

    fn current_cursor(&self) -> Cursor {
        self.cursors.current()
    }
}
