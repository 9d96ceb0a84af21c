//! Platform-agnostic input events.
//!
//! These are fed into a [`BaseInteractionHandler`](super::BaseInteractionHandler)
//! (or its touch wrapper), which turns them into gesture calls.
//!
//! # Example
//!
//! ```ignore
//! handler.handle_event(
//!     &InputEvent::PointerMove(PointerSample::mouse(Vec2::new(100.0, 200.0))),
//!     Instant::now(),
//! );
//! ```

use glam::Vec2;

/// Input event in client (page) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer went down over the viewer element.
    PointerDown(PointerSample),
    /// A pointer moved anywhere in the window.
    PointerMove(PointerSample),
    /// A pointer was released anywhere in the window.
    PointerUp(PointerSample),
    /// Wheel scrolled over the viewer element.
    Wheel(WheelSample),
    /// A key was pressed.
    KeyDown {
        /// Physical key code (`KeyboardEvent.code`), e.g. `"KeyF"`.
        code: String,
        /// Modifier keys held.
        modifiers: Modifiers,
    },
    /// Modifier key state changed.
    ModifiersChanged(Modifiers),
}

/// Identifier of one active pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PointerId(pub i32);

/// Kind of device behind a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    /// Mouse or trackpad.
    #[default]
    Mouse,
    /// Finger on a touch screen.
    Touch,
    /// Stylus.
    Pen,
}

impl PointerType {
    /// Whether the pointer is imprecise and needs a larger drag threshold.
    #[must_use]
    pub fn is_coarse(self) -> bool {
        self == Self::Touch
    }
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    /// Primary (left) mouse button, or any touch/pen contact.
    #[default]
    Left,
    /// Middle mouse button (wheel click).
    Middle,
    /// Secondary (right) mouse button.
    Right,
}

impl MouseButton {
    /// Decode `MouseEvent.button`, the button that changed state.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Right,
            _ => Self::Left,
        }
    }

    /// Decode the `MouseEvent.buttons` mask of held buttons. A secondary
    /// button chorded with the primary one wins.
    #[must_use]
    pub fn from_dom_buttons(buttons: u16) -> Self {
        if buttons & 2 != 0 {
            Self::Right
        } else if buttons & 4 != 0 {
            Self::Middle
        } else {
            Self::Left
        }
    }
}

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt / Option.
    pub alt: bool,
    /// Meta / Command.
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Whether no modifier is held.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

/// One pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Which pointer.
    pub pointer_id: PointerId,
    /// Device kind.
    pub pointer_type: PointerType,
    /// Button that changed (down/up) or is held (move).
    pub button: MouseButton,
    /// Client position in CSS pixels.
    pub position: Vec2,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl PointerSample {
    /// Left-button mouse sample at `position`.
    #[must_use]
    pub fn mouse(position: Vec2) -> Self {
        Self {
            pointer_id: PointerId(1),
            pointer_type: PointerType::Mouse,
            button: MouseButton::Left,
            position,
            modifiers: Modifiers::NONE,
        }
    }

    /// Touch sample for finger `id` at `position`.
    #[must_use]
    pub fn touch(id: i32, position: Vec2) -> Self {
        Self {
            pointer_id: PointerId(id),
            pointer_type: PointerType::Touch,
            ..Self::mouse(position)
        }
    }

    /// Same sample with a different button.
    #[must_use]
    pub fn with_button(self, button: MouseButton) -> Self {
        Self { button, ..self }
    }

    /// Same sample with different modifiers.
    #[must_use]
    pub fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// Same sample at a different position.
    #[must_use]
    pub fn at(self, position: Vec2) -> Self {
        Self { position, ..self }
    }
}

/// Unit of a wheel delta (`WheelEvent.deltaMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeltaMode {
    /// Pixels (mode 0).
    #[default]
    Pixel,
    /// Lines (mode 1).
    Line,
    /// Pages (mode 2).
    Page,
}

impl DeltaMode {
    /// Decode `WheelEvent.deltaMode`; unknown values read as pixels.
    #[must_use]
    pub fn from_dom(mode: u32) -> Self {
        match mode {
            1 => Self::Line,
            2 => Self::Page,
            _ => Self::Pixel,
        }
    }
}

/// One wheel event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelSample {
    /// Client position in CSS pixels.
    pub position: Vec2,
    /// Vertical scroll amount in `delta_mode` units.
    pub delta_y: f32,
    /// Unit of `delta_y`.
    pub delta_mode: DeltaMode,
    /// Pixels per line, from the element's computed font size.
    pub line_height: f32,
    /// Pixels per page, from the window height.
    pub page_height: f32,
    /// Modifier keys held.
    pub modifiers: Modifiers,
}

impl WheelSample {
    /// Pixel-mode wheel sample.
    #[must_use]
    pub fn pixels(position: Vec2, delta_y: f32) -> Self {
        Self {
            position,
            delta_y,
            delta_mode: DeltaMode::Pixel,
            line_height: 16.0,
            page_height: 800.0,
            modifiers: Modifiers::NONE,
        }
    }

    /// Scroll amount converted to pixels.
    #[must_use]
    pub fn pixel_delta(&self) -> f32 {
        match self.delta_mode {
            DeltaMode::Pixel => self.delta_y,
            DeltaMode::Line => self.delta_y * self.line_height,
            DeltaMode::Page => self.delta_y * self.page_height,
        }
    }
}
