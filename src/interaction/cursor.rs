//! Priority-ordered cursor stack.
//!
//! Several parts of a viewer want to change the cursor at once (a drag in
//! progress, a hover highlight, a measurement tool). Each registers its
//! cursor with a priority; the highest priority wins and the most recent
//! registration breaks ties.

/// CSS cursor to show over the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// Platform default arrow.
    #[default]
    Default,
    /// Hovering something clickable.
    Pointer,
    /// Ready to drag.
    Grab,
    /// Dragging.
    Grabbing,
    /// Panning.
    Move,
    /// Zooming.
    ZoomIn,
    /// Precise picking.
    Crosshair,
    /// Any other CSS cursor value.
    Custom(String),
}

impl Cursor {
    /// CSS `cursor` property value.
    #[must_use]
    pub fn css_name(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Pointer => "pointer",
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
            Self::Move => "move",
            Self::ZoomIn => "zoom-in",
            Self::Crosshair => "crosshair",
            Self::Custom(name) => name,
        }
    }
}

/// Precedence of a registered cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CursorPriority {
    /// Hints such as hover feedback.
    Low,
    /// Active gestures.
    Medium,
    /// Modal tools.
    High,
}

/// Token returned by [`CursorManager::add`]; pass it back to remove the
/// cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorHandle(u64);

/// Stack of active cursors.
#[derive(Debug, Default)]
pub struct CursorManager {
    entries: Vec<(CursorHandle, Cursor, CursorPriority)>,
    next_handle: u64,
}

impl CursorManager {
    /// Empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cursor.
    pub fn add(&mut self, cursor: Cursor, priority: CursorPriority) -> CursorHandle {
        let handle = CursorHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push((handle, cursor, priority));
        handle
    }

    /// Unregister a cursor. Returns `false` if it was already removed.
    pub fn remove(&mut self, handle: CursorHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _, _)| *h != handle);
        self.entries.len() != before
    }

    /// Cursor that should be shown now.
    #[must_use]
    pub fn current(&self) -> Cursor {
        self.entries
            .iter()
            // max_by_key keeps the last of equal maxima, i.e. the newest
            .max_by_key(|(_, _, priority)| *priority)
            .map_or(Cursor::Default, |(_, cursor, _)| cursor.clone())
    }
}
