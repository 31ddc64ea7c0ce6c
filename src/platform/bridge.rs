//=========================================================================
// Winit Input Bridge
//=========================================================================
//
// Routes winit window events into the kit's input components.
//
// ```text
//   ApplicationHandler::window_event
//         ↓
//   WinitInputBridge::handle_window_event
//     ├─ ModifiersChanged  → cached, stamped on later events
//     ├─ CursorMoved       → PointerEvent (Moved)
//     ├─ MouseInput        → PointerEvent (Began / Ended)
//     ├─ Touch             → PointerEvent (any phase)
//     └─ KeyboardInput     → KeyEvent (Down / Up)
//         ↓
//   InputSender ──> PointerEventComponent / KeyboardEventComponent
// ```
//
// Modifier state is sticky: it applies to every event until the next
// ModifiersChanged. Locations are physical window pixels, top-left origin.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};
use winit::event::{ElementState, MouseButton as WinitMouseButton, TouchPhase, WindowEvent};
use winit::keyboard::{ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use super::conversions::key_code;
use crate::core::input::{
    InputSender, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerPhase, PointerSource,
};
use crate::core::node::Point;

//=== WinitInputBridge ====================================================

/// Converts winit events and forwards them to connected input feeds.
///
/// The bridge holds only [`InputSender`]s, so it can live in the host's
/// `ApplicationHandler` while the components live in a scene.
#[derive(Debug, Default)]
pub struct WinitInputBridge {
    modifiers: Modifiers,
    cursor: Point,
    buttons_down: Vec<MouseButton>,
    pointer: Option<InputSender<PointerEvent>>,
    keyboard: Option<InputSender<KeyEvent>>,
    forwarded: u64,
}

impl WinitInputBridge {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards pointer events to `sender` (replaces any previous one).
    pub fn connect_pointer(&mut self, sender: InputSender<PointerEvent>) {
        debug!(target: "platform", "pointer feed connected");
        self.pointer = Some(sender);
    }

    /// Forwards key events to `sender` (replaces any previous one).
    pub fn connect_keyboard(&mut self, sender: InputSender<KeyEvent>) {
        debug!(target: "platform", "keyboard feed connected");
        self.keyboard = Some(sender);
    }

    pub fn disconnect_all(&mut self) {
        self.pointer = None;
        self.keyboard = None;
    }

    //--- State ------------------------------------------------------------

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Last cursor position reported by the window.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Number of events successfully handed to a feed.
    pub fn forwarded_count(&self) -> u64 {
        self.forwarded
    }

    //=====================================================================
    // Event Dispatch
    //=====================================================================

    /// Handles one window event; returns `true` if it was an input event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers_changed(modifiers.state());
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(position.x, position.y);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*button, *state);
                true
            }
            WindowEvent::Touch(touch) => {
                self.touch(touch.id, touch.phase, touch.location.x, touch.location.y);
                true
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.key_input(event.physical_key, event.state);
                true
            }
            _ => false,
        }
    }

    //--- Individual Events ------------------------------------------------

    pub fn modifiers_changed(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
        trace!(target: "platform", "modifiers: {:?}", self.modifiers);
        self.send_key(KeyEvent::ModifiersChanged(self.modifiers));
    }

    /// Cursor moved; a drag if a mouse button is held, a hover otherwise.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = Point::new(x as f32, y as f32);
        let source = match self.buttons_down.first() {
            Some(button) => PointerSource::Mouse(*button),
            None => PointerSource::Cursor,
        };
        self.send_pointer(PointerPhase::Moved, self.cursor, source);
    }

    pub fn mouse_input(&mut self, button: WinitMouseButton, state: ElementState) {
        let button = MouseButton::from(button);
        let phase = match state {
            ElementState::Pressed => {
                if self.buttons_down.contains(&button) {
                    return;
                }
                self.buttons_down.push(button);
                PointerPhase::Began
            }
            ElementState::Released => {
                let before = self.buttons_down.len();
                self.buttons_down.retain(|held| *held != button);
                if self.buttons_down.len() == before {
                    return;
                }
                PointerPhase::Ended
            }
        };
        self.send_pointer(phase, self.cursor, PointerSource::Mouse(button));
    }

    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) {
        let location = Point::new(x as f32, y as f32);
        self.send_pointer(PointerPhase::from(phase), location, PointerSource::Touch { id });
    }

    /// Key transition; keys the kit does not model are dropped.
    pub fn key_input(&mut self, key: PhysicalKey, state: ElementState) {
        let Some(key) = key_code(key) else {
            trace!(target: "platform", "unmapped key ignored: {:?}", key);
            return;
        };
        let modifiers = self.modifiers;
        let event = match state {
            ElementState::Pressed => KeyEvent::Down { key, modifiers },
            ElementState::Released => KeyEvent::Up { key, modifiers },
        };
        self.send_key(event);
    }

    //--- Internal Helpers -------------------------------------------------

    fn send_pointer(&mut self, phase: PointerPhase, location: Point, source: PointerSource) {
        let Some(sender) = &self.pointer else { return };
        let event = PointerEvent::new(phase, location, source).with_modifiers(self.modifiers);
        if sender.send(event) {
            self.forwarded += 1;
        }
    }

    fn send_key(&mut self, event: KeyEvent) {
        let Some(sender) = &self.keyboard else { return };
        if sender.send(event) {
            self.forwarded += 1;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
