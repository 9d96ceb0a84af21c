//! Two-point touch arbitration layered over [`BaseInteractionHandler`].
//!
//! One finger behaves like a mouse. When a second goes down the pair takes
//! over: single-pointer handling is disabled, one bracket opens, and each
//! move of either finger yields a combined pan, pinch zoom, and twist.
//! Single-pointer handling stays off until every finger has lifted.

use std::mem;

use glam::Vec2;
use rustc_hash::FxHashMap;
use web_time::Instant;

use super::event::{InputEvent, PointerId, PointerSample};
use super::handler::BaseInteractionHandler;
use crate::geometry::signed_angle;
use crate::interaction::InteractionApi;

/// Scale applied to the averaged finger movement.
const PAN_SCALE: f32 = 0.25;
/// Scale applied to the change in finger spread.
const ZOOM_SCALE: f32 = 0.5;
/// Twist samples held before a forced flush.
const TWIST_HISTORY_LEN: usize = 5;
/// Accumulated twist, in degrees, that flushes early.
const TWIST_FLUSH_DEGREES: f32 = 3.0;

/// Touch-aware input handler.
pub struct TouchInteractionHandler<A> {
    base: BaseInteractionHandler<A>,
    points: FxHashMap<PointerId, Vec2>,
    /// The two pointers driving the two-point gesture, sorted.
    pair: Option<[PointerId; 2]>,
    twist_history: Vec<f32>,
}

impl<A: InteractionApi> TouchInteractionHandler<A> {
    /// Handler driving `api`.
    pub fn new(api: A) -> Self {
        Self::from_base(BaseInteractionHandler::new(api))
    }

    /// Wrap an already configured base handler.
    #[must_use]
    pub fn from_base(base: BaseInteractionHandler<A>) -> Self {
        Self {
            base,
            points: FxHashMap::default(),
            pair: None,
            twist_history: Vec::with_capacity(TWIST_HISTORY_LEN),
        }
    }

    /// The single-pointer handler underneath.
    #[must_use]
    pub fn base(&self) -> &BaseInteractionHandler<A> {
        &self.base
    }

    /// Mutable access to the single-pointer handler.
    pub fn base_mut(&mut self) -> &mut BaseInteractionHandler<A> {
        &mut self.base
    }

    /// The interaction API.
    #[must_use]
    pub fn api(&self) -> &A {
        self.base.api()
    }

    /// Mutable access to the interaction API.
    pub fn api_mut(&mut self) -> &mut A {
        self.base.api_mut()
    }

    /// Whether a two-point gesture is running.
    #[must_use]
    pub fn is_two_point(&self) -> bool {
        self.pair.is_some()
    }

    /// Number of pointers currently down.
    #[must_use]
    pub fn active_points(&self) -> usize {
        self.points.len()
    }

    /// Feed one input event.
    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) {
        match event {
            InputEvent::PointerDown(sample) => self.pointer_down(sample, now),
            InputEvent::PointerMove(sample) => self.pointer_move(sample, now),
            InputEvent::PointerUp(sample) => self.pointer_up(sample, now),
            other => self.base.handle_event(other, now),
        }
    }

    /// Pointer pressed over the element.
    pub fn pointer_down(&mut self, sample: &PointerSample, now: Instant) {
        let _ = self.points.insert(sample.pointer_id, sample.position);
        if self.pair.is_none() && self.points.len() == 2 {
            self.begin_two_point();
            return;
        }
        self.base.pointer_down(sample, now);
    }

    /// Pointer moved anywhere in the window.
    pub fn pointer_move(&mut self, sample: &PointerSample, now: Instant) {
        let id = sample.pointer_id;
        let Some(slot) = self.points.get_mut(&id) else {
            // Hover, or a pointer that went down elsewhere.
            self.base.pointer_move(sample, now);
            return;
        };
        let previous = mem::replace(slot, sample.position);
        match self.pair {
            Some([a, b]) if a == id || b == id => {
                let other_id = if a == id { b } else { a };
                if let Some(other) = self.points.get(&other_id).copied() {
                    self.two_point_move(previous, sample.position, other);
                }
            }
            _ => self.base.pointer_move(sample, now),
        }
    }

    /// Pointer released anywhere in the window.
    pub fn pointer_up(&mut self, sample: &PointerSample, now: Instant) {
        let id = sample.pointer_id;
        let _ = self.points.remove(&id);
        match self.pair {
            Some([a, b]) if a == id || b == id => self.end_two_point(),
            _ => self.base.pointer_up(sample, now),
        }
        if self.points.is_empty() && self.base.individual_interactions_disabled()
        {
            self.base.set_individual_interactions_disabled(false);
        }
    }

    /// Fire due deadlines in the single-pointer handler.
    pub fn tick(&mut self, now: Instant) {
        self.base.tick(now);
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.base.next_deadline()
    }

    /// Tear down, closing any open bracket.
    pub fn dispose(&mut self) {
        if self.pair.is_some() {
            self.end_two_point();
        }
        self.points.clear();
        self.base.dispose();
    }

    fn begin_two_point(&mut self) {
        let mut ids: Vec<PointerId> = self.points.keys().copied().collect();
        ids.sort_unstable();
        let [a, b] = ids.as_slice() else {
            return;
        };
        log::debug!("two-point gesture started with {a:?} and {b:?}");
        self.pair = Some([*a, *b]);
        self.twist_history.clear();
        // Drops any single-pointer drag; its bracket carries over.
        self.base.set_individual_interactions_disabled(true);
        self.base.api_mut().begin_interaction();
    }

    fn end_two_point(&mut self) {
        log::debug!("two-point gesture finished");
        self.pair = None;
        self.twist_history.clear();
        self.base.api_mut().end_interaction();
    }

    /// One finger moved from `previous` to `next` while the other rests at
    /// `other`.
    fn two_point_move(&mut self, previous: Vec2, next: Vec2, other: Vec2) {
        // The resting finger contributes a zero delta to the average.
        let pan = (next - previous) * 0.5 * PAN_SCALE;
        let zoom = (next.distance(other) - previous.distance(other)) * ZOOM_SCALE;
        let twist = signed_angle(previous - other, next - other).to_degrees();
        let midpoint = self.base.canvas_point((next + other) * 0.5);

        let api = self.base.api_mut();
        if pan != Vec2::ZERO {
            api.pan_camera_by_delta(pan);
        }
        if zoom != 0.0 {
            api.zoom_camera_to_point(midpoint, zoom);
        }

        self.twist_history.push(twist);
        let sum: f32 = self.twist_history.iter().sum();
        if self.twist_history.len() >= TWIST_HISTORY_LEN
            || sum.abs() > TWIST_FLUSH_DEGREES
        {
            self.twist_history.clear();
            if sum != 0.0 {
                self.base.api_mut().twist_camera(sum);
            }
        }
    }
}
