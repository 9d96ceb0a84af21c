//! Pointer state machine that turns raw input into gesture calls.
//!
//! A press goes idle → pending → dragging → idle. While pending, an
//! interaction delay runs and moves are only remembered; once it expires the
//! last move is replayed so the first real movement is never lost. A drag
//! starts when the pointer has travelled the API's pixel threshold, and the
//! gesture chosen then stays locked in until release. Two things can hand
//! the drag over: holding Alt+Shift switches to twist, and a chorded button
//! switches to whatever that button selects.
//!
//! All timing is explicit: every entry point takes `now`, and
//! [`BaseInteractionHandler::tick`] fires whatever deadlines have passed.

use std::mem;

use glam::Vec2;
use web_time::{Duration, Instant};

use super::event::{InputEvent, Modifiers, MouseButton, PointerSample, WheelSample};
use super::gestures::{GestureKind, Gestures};
use super::keyboard::KeyAction;
use super::tap::{TapKind, TapTracker};
use crate::interaction::{CursorHandle, CursorPriority, InteractionApi, TapDetails};
use crate::util::timer::{Deadline, TimerQueue};
use crate::viewport::ElementBounds;

/// Share of one wheel event applied by each smoothing step.
const WHEEL_STEP_WEIGHTS: [f32; 5] = [0.2, 0.15, 0.25, 0.25, 0.15];
/// Spacing of the smoothing steps.
const WHEEL_STEP_INTERVAL: Duration = Duration::from_millis(2);
/// Zoom delta per wheel pixel.
pub const WHEEL_DELTA_SCALE: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
struct WheelStep {
    point: Vec2,
    delta: f32,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    down: PointerSample,
    delay: Option<Deadline>,
    last_move: Option<PointerSample>,
    long_press: Option<Deadline>,
    long_pressed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
enum PointerSession {
    #[default]
    Idle,
    Pending(Pending),
    Dragging {
        down: PointerSample,
        kind: GestureKind,
    },
}

/// Input state machine for one viewer element.
pub struct BaseInteractionHandler<A> {
    api: A,
    element: Option<Box<dyn ElementBounds>>,
    gestures: Gestures,
    /// Transient override from held modifier keys.
    current: Option<GestureKind>,
    session: PointerSession,
    wheel_steps: TimerQueue<WheelStep>,
    taps: TapTracker,
    individual_disabled: bool,
    drag_cursor: Option<CursorHandle>,
}

impl<A: InteractionApi> BaseInteractionHandler<A> {
    /// Handler driving `api`, with client and canvas coordinates equal.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            element: None,
            gestures: Gestures::new(),
            current: None,
            session: PointerSession::Idle,
            wheel_steps: TimerQueue::new(),
            taps: TapTracker::new(),
            individual_disabled: false,
            drag_cursor: None,
        }
    }

    /// Map client positions through `element`'s bounds.
    #[must_use]
    pub fn with_element(mut self, element: impl ElementBounds + 'static) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    /// The interaction API.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Mutable access to the interaction API.
    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    /// The gesture primitives.
    #[must_use]
    pub fn gestures(&self) -> &Gestures {
        &self.gestures
    }

    /// Gesture a plain left drag performs.
    #[must_use]
    pub fn primary_interaction(&self) -> GestureKind {
        self.api.options().interactions.primary_interaction
    }

    /// Modifier override in effect, if any.
    #[must_use]
    pub fn current_interaction(&self) -> Option<GestureKind> {
        self.current
    }

    /// Gesture locked in for the running drag.
    #[must_use]
    pub fn dragging_interaction(&self) -> Option<GestureKind> {
        match self.session {
            PointerSession::Dragging { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Whether a press is waiting to become a tap or a drag.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.session, PointerSession::Pending(_))
    }

    /// Feed one input event.
    pub fn handle_event(&mut self, event: &InputEvent, now: Instant) {
        match event {
            InputEvent::PointerDown(sample) => self.pointer_down(sample, now),
            InputEvent::PointerMove(sample) => self.pointer_move(sample, now),
            InputEvent::PointerUp(sample) => self.pointer_up(sample, now),
            InputEvent::Wheel(wheel) => self.wheel(wheel, now),
            InputEvent::KeyDown { code, modifiers } => {
                self.set_modifiers(*modifiers);
                let _ = self.handle_key_press(code);
            }
            InputEvent::ModifiersChanged(modifiers) => {
                self.set_modifiers(*modifiers);
            }
        }
    }

    /// Update the modifier override: Shift alone selects pan.
    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        let shift_only = modifiers.shift
            && !modifiers.alt
            && !modifiers.meta
            && !modifiers.ctrl;
        self.current = shift_only.then_some(GestureKind::Pan);
    }

    /// Pointer pressed over the element.
    pub fn pointer_down(&mut self, sample: &PointerSample, now: Instant) {
        self.set_modifiers(sample.modifiers);
        match self.session {
            PointerSession::Dragging { kind, .. } => {
                // Another button joined the drag.
                self.hold_button(sample.button);
                let next = self.resolve(sample.button, sample.modifiers);
                if next != kind {
                    self.switch_drag(next, sample);
                }
                return;
            }
            PointerSession::Pending(_) => return,
            PointerSession::Idle => {}
        }
        if self.individual_disabled {
            return;
        }

        let options = self.api.options();
        let delay = options.interactions.interaction_delay();
        self.session = PointerSession::Pending(Pending {
            down: *sample,
            delay: (!delay.is_zero()).then(|| Deadline::after(now, delay)),
            last_move: None,
            long_press: Some(Deadline::after(
                now,
                options.events.long_press_threshold(),
            )),
            long_pressed: false,
        });
    }

    /// Pointer moved anywhere in the window.
    pub fn pointer_move(&mut self, sample: &PointerSample, now: Instant) {
        self.set_modifiers(sample.modifiers);
        if self.individual_disabled {
            return;
        }
        match &mut self.session {
            PointerSession::Idle => {}
            PointerSession::Pending(pending) => {
                if pending.down.pointer_id != sample.pointer_id {
                    return;
                }
                if pending.delay.is_some_and(|d| !d.is_due(now)) {
                    pending.last_move = Some(*sample);
                    return;
                }
                pending.delay = None;
                self.try_begin_drag(sample);
            }
            PointerSession::Dragging { down, .. } => {
                if down.pointer_id == sample.pointer_id {
                    self.drag_tick(sample);
                }
            }
        }
    }

    /// Pointer released anywhere in the window.
    pub fn pointer_up(&mut self, sample: &PointerSample, now: Instant) {
        self.set_modifiers(sample.modifiers);
        match mem::take(&mut self.session) {
            PointerSession::Idle => {}
            PointerSession::Pending(pending) => {
                if pending.down.pointer_id != sample.pointer_id {
                    self.session = PointerSession::Pending(pending);
                    return;
                }
                if !pending.long_pressed {
                    self.emit_tap(&pending.down, sample, now);
                }
            }
            PointerSession::Dragging { down, kind } => {
                if down.pointer_id != sample.pointer_id {
                    self.session = PointerSession::Dragging { down, kind };
                    return;
                }
                self.gestures.get_mut(kind).end_drag(sample, &mut self.api);
                self.clear_drag_cursor();
            }
        }
    }

    /// Wheel scrolled over the element.
    ///
    /// One event is spread over five weighted zoom steps 2 ms apart; the
    /// first applies immediately, the rest from [`tick`](Self::tick).
    pub fn wheel(&mut self, wheel: &WheelSample, now: Instant) {
        let options = self.api.options();
        let mut base = -wheel.pixel_delta() * WHEEL_DELTA_SCALE;
        if options.interactions.reverse_mouse_wheel_direction {
            base = -base;
        }
        if base == 0.0 {
            return;
        }
        let point = self.canvas_point(wheel.position);
        let mut at = now;
        for weight in WHEEL_STEP_WEIGHTS {
            self.wheel_steps.schedule(
                at,
                WheelStep {
                    point,
                    delta: base * weight,
                },
            );
            at += WHEEL_STEP_INTERVAL;
        }
        self.run_wheel_steps(now);
    }

    /// Run a bound key's camera action. Returns whether the key is bound.
    ///
    /// Outside a drag the action gets its own interaction bracket.
    pub fn handle_key_press(&mut self, code: &str) -> bool {
        let options = self.api.options();
        let Some(action) = options.keybindings.lookup(code) else {
            return false;
        };
        let degrees = options.interactions.keyboard_twist_degrees;
        let opened = !self.api.is_interacting();
        if opened {
            self.api.begin_interaction();
        }
        match action {
            KeyAction::ViewAll => self.api.view_all(),
            KeyAction::TwistClockwise => self.api.twist_camera(degrees),
            KeyAction::TwistCounterClockwise => self.api.twist_camera(-degrees),
        }
        if opened {
            self.api.end_interaction();
        }
        true
    }

    /// Fire every deadline that has passed: interaction delay (replaying
    /// the last move), long press, wheel steps, and wheel session end.
    pub fn tick(&mut self, now: Instant) {
        self.fire_interaction_delay(now);
        self.fire_long_press(now);
        self.run_wheel_steps(now);
        let drag_active =
            matches!(self.session, PointerSession::Dragging { .. });
        self.gestures
            .zoom_mut()
            .end_wheel_if_due(now, drag_active, &mut self.api);
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let (delay, long_press) = match &self.session {
            PointerSession::Pending(pending) => (pending.delay, pending.long_press),
            _ => (None, None),
        };
        [
            delay.map(|d| d.at()),
            long_press.map(|d| d.at()),
            self.wheel_steps.next_due(),
            self.gestures.zoom().wheel_deadline().map(|d| d.at()),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Stop reacting to single-pointer input, e.g. while a two-finger
    /// gesture runs. A drag in progress is dropped without closing the
    /// bracket; whoever takes over closes it.
    pub fn set_individual_interactions_disabled(&mut self, disabled: bool) {
        self.individual_disabled = disabled;
        if !disabled {
            return;
        }
        if let PointerSession::Dragging { kind, .. } = mem::take(&mut self.session) {
            log::debug!("{kind:?} drag handed over");
            self.gestures.get_mut(kind).cancel();
            self.clear_drag_cursor();
        }
    }

    /// Whether single-pointer input is ignored.
    #[must_use]
    pub fn individual_interactions_disabled(&self) -> bool {
        self.individual_disabled
    }

    /// Tear down: close any open drag or wheel bracket and drop all timers.
    pub fn dispose(&mut self) {
        let wheel_owned = self.gestures.zoom_mut().cancel_wheel();
        self.wheel_steps.clear();
        if let PointerSession::Dragging { down, kind } = mem::take(&mut self.session) {
            self.gestures.get_mut(kind).end_drag(&down, &mut self.api);
        }
        if wheel_owned {
            self.api.end_interaction();
        }
        self.clear_drag_cursor();
    }

    /// Client position mapped into the element's canvas coordinates.
    #[must_use]
    pub fn canvas_point(&self, client: Vec2) -> Vec2 {
        self.element
            .as_ref()
            .map_or(client, |e| e.bounding_rect().to_local(client))
    }

    fn resolve(&self, button: MouseButton, modifiers: Modifiers) -> GestureKind {
        if modifiers.shift && modifiers.meta {
            return GestureKind::RotatePoint;
        }
        if modifiers.shift && modifiers.alt {
            return GestureKind::Twist;
        }
        match button {
            MouseButton::Right | MouseButton::Middle => GestureKind::Pan,
            MouseButton::Left => {
                self.current.unwrap_or_else(|| self.primary_interaction())
            }
        }
    }

    fn try_begin_drag(&mut self, sample: &PointerSample) {
        let PointerSession::Pending(pending) = self.session else {
            return;
        };
        let threshold = self.api.pixel_threshold(sample.pointer_type.is_coarse());
        if sample.position.distance(pending.down.position) < threshold {
            return;
        }

        let down = pending.down.with_modifiers(sample.modifiers);
        let kind = self.resolve(down.button, sample.modifiers);
        log::debug!("{kind:?} drag started");
        self.taps.reset();
        self.session = PointerSession::Dragging { down, kind };

        let canvas = self.canvas_point(down.position);
        let element = self.element.as_deref();
        let gesture = self.gestures.get_mut(kind);
        gesture.begin_drag(&down, canvas, &mut self.api, element);
        gesture.drag(sample, &mut self.api);
        self.set_drag_cursor(kind);
    }

    fn drag_tick(&mut self, sample: &PointerSample) {
        let PointerSession::Dragging { down, kind } = self.session else {
            return;
        };
        let twist_held = sample.modifiers.shift && sample.modifiers.alt;
        // Hosts that report chords on moves (the DOM does) change the held
        // button mid-drag without a second press.
        let chorded = sample.button != down.button;
        if chorded {
            self.hold_button(sample.button);
        }
        let next = if twist_held {
            GestureKind::Twist
        } else if chorded || kind == GestureKind::Twist {
            self.resolve(sample.button, sample.modifiers)
        } else {
            kind
        };
        if next != kind {
            self.switch_drag(next, sample);
        }
        self.gestures.get_mut(next).drag(sample, &mut self.api);
    }

    fn hold_button(&mut self, button: MouseButton) {
        if let PointerSession::Dragging { down, .. } = &mut self.session {
            down.button = button;
        }
    }

    /// Hand the running drag to another gesture inside the same bracket.
    fn switch_drag(&mut self, next: GestureKind, sample: &PointerSample) {
        let PointerSession::Dragging { down, kind } = self.session else {
            return;
        };
        log::debug!("drag switched from {kind:?} to {next:?}");
        self.gestures.get_mut(kind).cancel();
        self.api.reset_anchors();
        self.session = PointerSession::Dragging { down, kind: next };

        let canvas = self.canvas_point(sample.position);
        let element = self.element.as_deref();
        self.gestures
            .get_mut(next)
            .begin_drag(sample, canvas, &mut self.api, element);
        self.set_drag_cursor(next);
    }

    fn emit_tap(&mut self, down: &PointerSample, up: &PointerSample, now: Instant) {
        let window = self.api.options().events.double_tap_threshold();
        let radius = self.api.pixel_threshold(down.pointer_type.is_coarse());
        let details = TapDetails {
            position: self.canvas_point(up.position),
            button: down.button,
            pointer_type: down.pointer_type,
            modifiers: up.modifiers,
        };
        match self.taps.register(details.position, now, window, radius) {
            TapKind::Single => self.api.tap(details),
            TapKind::Double => self.api.double_tap(details),
        }
    }

    fn fire_interaction_delay(&mut self, now: Instant) {
        let PointerSession::Pending(pending) = &mut self.session else {
            return;
        };
        if !pending.delay.is_some_and(|d| d.is_due(now)) {
            return;
        }
        pending.delay = None;
        let Some(last_move) = pending.last_move.take() else {
            return;
        };
        if !self.individual_disabled {
            self.try_begin_drag(&last_move);
        }
    }

    fn fire_long_press(&mut self, now: Instant) {
        let PointerSession::Pending(pending) = &mut self.session else {
            return;
        };
        if pending.long_pressed || !pending.long_press.is_some_and(|d| d.is_due(now)) {
            return;
        }
        pending.long_pressed = true;
        pending.long_press = None;
        let down = pending.down;
        let details = TapDetails {
            position: self.canvas_point(down.position),
            button: down.button,
            pointer_type: down.pointer_type,
            modifiers: down.modifiers,
        };
        self.api.long_press(details);
    }

    fn run_wheel_steps(&mut self, now: Instant) {
        for step in self.wheel_steps.drain_due(now) {
            self.gestures
                .zoom_mut()
                .zoom(step.point, step.delta, &mut self.api, now);
        }
    }

    fn set_drag_cursor(&mut self, kind: GestureKind) {
        self.clear_drag_cursor();
        self.drag_cursor =
            Some(self.api.add_cursor(kind.cursor(), CursorPriority::Medium));
    }

    fn clear_drag_cursor(&mut self) {
        if let Some(handle) = self.drag_cursor.take() {
            self.api.remove_cursor(handle);
        }
    }
}
