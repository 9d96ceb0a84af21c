//! Browser bindings, behind the `web` feature.
//!
//! [`attach`] wires DOM pointer, wheel, and key events on a viewer element
//! into a [`TouchInteractionHandler`] and drives its deadlines from a 16 ms
//! interval. The same interval mirrors the API's current cursor onto the
//! element style. Frames, reconnects, and render timeouts stay with the host,
//! which owns the stream connection.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, HtmlElement,
    KeyboardEvent, PointerEvent, WheelEvent, Window,
};
use web_time::Instant;

use crate::input::{
    DeltaMode, InputEvent, Modifiers, MouseButton, PointerId, PointerSample,
    PointerType, TouchInteractionHandler, WheelSample,
};
use crate::interaction::{Cursor, InteractionApi};
use crate::viewport::{ElementBounds, Rect};

/// Interval between deadline ticks.
const TICK_INTERVAL_MS: i32 = 16;
/// Line height used when the element's font size can't be read.
const DEFAULT_LINE_HEIGHT: f32 = 16.0;
/// Page height used when the window height can't be read.
const DEFAULT_PAGE_HEIGHT: f32 = 800.0;

type Listener = Closure<dyn FnMut(Event)>;

/// Route `log` output to the browser console and panics to
/// `console.error`. Safe to call more than once.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(level);
}

/// Current `window.devicePixelRatio`, or 1 outside a window.
#[must_use]
pub fn device_pixel_ratio() -> f32 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio() as f32)
}

impl ElementBounds for Element {
    fn bounding_rect(&self) -> Rect {
        let r = self.get_bounding_client_rect();
        Rect::new(r.x() as f32, r.y() as f32, r.width() as f32, r.height() as f32)
    }
}

/// Convert a DOM pointer event.
#[must_use]
pub fn pointer_sample(event: &PointerEvent) -> PointerSample {
    let pointer_type = match event.pointer_type().as_str() {
        "touch" => PointerType::Touch,
        "pen" => PointerType::Pen,
        _ => PointerType::Mouse,
    };
    // Chords never fire a second pointerdown, so moves carry the held
    // buttons instead of the one that changed.
    let button = if event.type_() == "pointermove" {
        MouseButton::from_dom_buttons(event.buttons())
    } else {
        MouseButton::from_dom(event.button())
    };
    PointerSample {
        pointer_id: PointerId(event.pointer_id()),
        pointer_type,
        button,
        position: Vec2::new(event.client_x() as f32, event.client_y() as f32),
        modifiers: Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
    }
}

/// Convert a DOM wheel event. `line_height` and `page_height` resolve
/// line- and page-mode deltas into pixels.
#[must_use]
pub fn wheel_sample(
    event: &WheelEvent,
    line_height: f32,
    page_height: f32,
) -> WheelSample {
    WheelSample {
        position: Vec2::new(event.client_x() as f32, event.client_y() as f32),
        delta_y: event.delta_y() as f32,
        delta_mode: DeltaMode::from_dom(event.delta_mode()),
        line_height,
        page_height,
        modifiers: Modifiers {
            shift: event.shift_key(),
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            meta: event.meta_key(),
        },
    }
}

/// Modifier state of a DOM keyboard event.
#[must_use]
pub fn key_modifiers(event: &KeyboardEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

fn line_height(element: &Element) -> f32 {
    web_sys::window()
        .and_then(|w| w.get_computed_style(element).ok().flatten())
        .and_then(|style| style.get_property_value("font-size").ok())
        .and_then(|size| size.trim_end_matches("px").parse().ok())
        .unwrap_or(DEFAULT_LINE_HEIGHT)
}

fn page_height() -> f32 {
    web_sys::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .map_or(DEFAULT_PAGE_HEIGHT, |h| h as f32)
}

struct Binding {
    target: EventTarget,
    name: &'static str,
    listener: Listener,
}

fn bind(
    target: &EventTarget,
    name: &'static str,
    passive: bool,
    listener: Listener,
) -> Result<Binding, JsValue> {
    let options = AddEventListenerOptions::new();
    options.set_passive(passive);
    target.add_event_listener_with_callback_and_add_event_listener_options(
        name,
        listener.as_ref().unchecked_ref(),
        &options,
    )?;
    Ok(Binding {
        target: target.clone(),
        name,
        listener,
    })
}

fn dispatch<A: InteractionApi>(
    handler: &RefCell<TouchInteractionHandler<A>>,
    event: &InputEvent,
) {
    match handler.try_borrow_mut() {
        Ok(mut handler) => handler.handle_event(event, Instant::now()),
        Err(_) => log::warn!("input dropped, handler busy: {event:?}"),
    }
}

fn pointer_listener<A: InteractionApi + 'static>(
    handler: &Rc<RefCell<TouchInteractionHandler<A>>>,
    wrap: fn(PointerSample) -> InputEvent,
) -> Listener {
    let handler = Rc::clone(handler);
    Closure::new(move |event: Event| {
        if let Some(event) = event.dyn_ref::<PointerEvent>() {
            dispatch(&handler, &wrap(pointer_sample(event)));
        }
    })
}

fn wheel_listener<A: InteractionApi + 'static>(
    handler: &Rc<RefCell<TouchInteractionHandler<A>>>,
    element: &Element,
) -> Listener {
    let handler = Rc::clone(handler);
    let element = element.clone();
    Closure::new(move |event: Event| {
        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        // Keep the page from scrolling under the viewer.
        wheel.prevent_default();
        let sample = wheel_sample(wheel, line_height(&element), page_height());
        dispatch(&handler, &InputEvent::Wheel(sample));
    })
}

fn key_down_listener<A: InteractionApi + 'static>(
    handler: &Rc<RefCell<TouchInteractionHandler<A>>>,
) -> Listener {
    let handler = Rc::clone(handler);
    Closure::new(move |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let Ok(mut handler) = handler.try_borrow_mut() else {
            return;
        };
        let base = handler.base_mut();
        base.set_modifiers(key_modifiers(key));
        if base.handle_key_press(&key.code()) {
            key.prevent_default();
        }
    })
}

fn key_up_listener<A: InteractionApi + 'static>(
    handler: &Rc<RefCell<TouchInteractionHandler<A>>>,
) -> Listener {
    let handler = Rc::clone(handler);
    Closure::new(move |event: Event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            dispatch(&handler, &InputEvent::ModifiersChanged(key_modifiers(key)));
        }
    })
}

/// Registered DOM listeners and the tick interval. Dropping this removes
/// them all.
pub struct Listeners {
    window: Window,
    bindings: Vec<Binding>,
    interval: i32,
    /// Referenced by the interval until drop.
    _tick: Closure<dyn FnMut()>,
}

impl Drop for Listeners {
    fn drop(&mut self) {
        for binding in &self.bindings {
            let _ = binding.target.remove_event_listener_with_callback(
                binding.name,
                binding.listener.as_ref().unchecked_ref(),
            );
        }
        self.window.clear_interval_with_handle(self.interval);
    }
}

/// Wire `element`'s input into `handler`.
///
/// Presses, wheel, and keys are taken from the element (give it a
/// `tabindex` for keys); moves, releases, and key-ups from the window so
/// drags keep working outside the element. The handler should have been
/// built with the same element for canvas coordinates.
pub fn attach<A: InteractionApi + 'static>(
    element: &Element,
    handler: &Rc<RefCell<TouchInteractionHandler<A>>>,
) -> Result<Listeners, JsValue> {
    let window =
        web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;

    let tick_handler = Rc::clone(handler);
    let cursor_target = element.dyn_ref::<HtmlElement>().cloned();
    let mut shown_cursor = Cursor::Default;
    let tick = Closure::<dyn FnMut()>::new(move || {
        let Ok(mut handler) = tick_handler.try_borrow_mut() else {
            return;
        };
        handler.tick(Instant::now());
        let cursor = handler.api().current_cursor();
        if cursor == shown_cursor {
            return;
        }
        if let Some(html) = &cursor_target {
            let _ = html.style().set_property("cursor", cursor.css_name());
        }
        shown_cursor = cursor;
    });
    let interval = window
        .set_interval_with_callback_and_timeout_and_arguments_0(
            tick.as_ref().unchecked_ref(),
            TICK_INTERVAL_MS,
        )?;
    // From here on, an early return unregisters whatever was bound.
    let mut listeners = Listeners {
        window: window.clone(),
        bindings: Vec::new(),
        interval,
        _tick: tick,
    };

    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        // Stop the browser from scrolling or zooming on touch drags.
        let _ = html.style().set_property("touch-action", "none");
    }

    let on_element: &EventTarget = element.as_ref();
    let on_window: &EventTarget = window.as_ref();
    let pointer: [(&EventTarget, &'static str, fn(PointerSample) -> InputEvent); 4] = [
        (on_element, "pointerdown", InputEvent::PointerDown),
        (on_window, "pointermove", InputEvent::PointerMove),
        (on_window, "pointerup", InputEvent::PointerUp),
        (on_window, "pointercancel", InputEvent::PointerUp),
    ];
    for (target, name, wrap) in pointer {
        listeners.bindings.push(bind(
            target,
            name,
            true,
            pointer_listener(handler, wrap),
        )?);
    }
    listeners.bindings.push(bind(
        on_element,
        "wheel",
        false,
        wheel_listener(handler, element),
    )?);
    listeners.bindings.push(bind(
        on_element,
        "keydown",
        false,
        key_down_listener(handler),
    )?);
    listeners.bindings.push(bind(
        on_window,
        "keyup",
        true,
        key_up_listener(handler),
    )?);
    // Right-drag pans; keep the menu out of the way.
    listeners.bindings.push(bind(
        on_element,
        "contextmenu",
        false,
        Closure::new(|event: Event| event.prevent_default()),
    )?);

    log::debug!("attached {} listeners", listeners.bindings.len());
    Ok(listeners)
}
