//=========================================================================
// Input Event Types
//=========================================================================
//
// Portable input samples forwarded by host glue into input components.
//
// ```text
// Host callbacks (winit, touch screen, motion sensors)
//         ↓
//    PointerEvent / KeyEvent / MotionSample   (this module)
//         ↓
//    InputSender ──> InputFeed (owned by an input component)
//         ↓
//    PointerEventComponent / KeyboardEventComponent / MotionEventComponent
// ```
//
// All types are plain values: Copy where the payload allows it, no heap
// allocations, no references to host objects.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::node::Point;

//=== MouseButton =========================================================

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Side, thumb and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical key location, independent of the keyboard layout.
///
/// `KeyA` is the same physical key on QWERTY and AZERTY keyboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// A key the kit has no variant for.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier keys held while an event was produced.
///
/// Left and right variants are not distinguished; `ctrl` also covers
/// Command on macOS and `alt` covers Option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };

    /// True when no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

//=== Pointer Events ======================================================

/// Stage of a touch or mouse interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Finger down or mouse button pressed.
    Began,

    /// Finger or cursor moved.
    Moved,

    /// Finger lifted or mouse button released.
    Ended,

    /// The host aborted the interaction (e.g. an incoming call).
    Cancelled,
}

/// What produced a [`PointerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerSource {
    /// A touch, identified for as long as the finger stays down.
    Touch { id: u64 },

    /// A mouse interaction driven by `button`.
    Mouse(MouseButton),

    /// Cursor movement with no button held.
    Cursor,
}

/// One touch or mouse sample.
///
/// `location` is in the coordinate space the host glue reports; the
/// winit bridge uses physical window pixels with a top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub location: Point,
    pub source: PointerSource,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, location: Point, source: PointerSource) -> Self {
        Self { phase, location, source, modifiers: Modifiers::NONE }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn is_touch(&self) -> bool {
        matches!(self.source, PointerSource::Touch { .. })
    }
}

//=== Key Events ==========================================================

/// Key transition with the modifier state at the time it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    Down { key: KeyCode, modifiers: Modifiers },
    Up { key: KeyCode, modifiers: Modifiers },

    /// Modifier state changed without a key transition.
    ModifiersChanged(Modifiers),
}

impl KeyEvent {
    /// Key this event is about, if any.
    pub fn key(&self) -> Option<KeyCode> {
        match self {
            Self::Down { key, .. } | Self::Up { key, .. } => Some(*key),
            Self::ModifiersChanged(_) => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::Down { modifiers, .. } | Self::Up { modifiers, .. } => *modifiers,
            Self::ModifiersChanged(modifiers) => *modifiers,
        }
    }
}

//=== Motion Samples ======================================================

/// Three-axis sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Component-wise `self - other`.
    pub fn delta(&self, other: &Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Accelerometer and gyroscope reading taken at `timestamp` (seconds,
/// host clock).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    pub acceleration: Vector3,
    pub rotation_rate: Vector3,
    pub timestamp: f64,
}

impl MotionSample {
    pub fn new(acceleration: Vector3, rotation_rate: Vector3, timestamp: f64) -> Self {
        Self { acceleration, rotation_rate, timestamp }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
