//=========================================================================
// Winit Conversions
//=========================================================================
//
// winit types → kit input types. Keys the kit has no variant for map to
// `KeyCode::Unidentified`; the bridge drops those.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::event::{MouseButton as WinitMouseButton, TouchPhase};
use winit::keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey};

//=== Internal Dependencies ===============================================

use crate::core::input::{KeyCode, Modifiers, MouseButton, PointerPhase};

//=== Modifiers ===========================================================

/// winit already folds Command into `control_key` and Option into
/// `alt_key` on macOS.
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

//=== Keys ================================================================

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        use WinitKeyCode as W;
        match code {
            W::Digit0 => Self::Digit0,
            W::Digit1 => Self::Digit1,
            W::Digit2 => Self::Digit2,
            W::Digit3 => Self::Digit3,
            W::Digit4 => Self::Digit4,
            W::Digit5 => Self::Digit5,
            W::Digit6 => Self::Digit6,
            W::Digit7 => Self::Digit7,
            W::Digit8 => Self::Digit8,
            W::Digit9 => Self::Digit9,

            W::KeyA => Self::KeyA,
            W::KeyB => Self::KeyB,
            W::KeyC => Self::KeyC,
            W::KeyD => Self::KeyD,
            W::KeyE => Self::KeyE,
            W::KeyF => Self::KeyF,
            W::KeyG => Self::KeyG,
            W::KeyH => Self::KeyH,
            W::KeyI => Self::KeyI,
            W::KeyJ => Self::KeyJ,
            W::KeyK => Self::KeyK,
            W::KeyL => Self::KeyL,
            W::KeyM => Self::KeyM,
            W::KeyN => Self::KeyN,
            W::KeyO => Self::KeyO,
            W::KeyP => Self::KeyP,
            W::KeyQ => Self::KeyQ,
            W::KeyR => Self::KeyR,
            W::KeyS => Self::KeyS,
            W::KeyT => Self::KeyT,
            W::KeyU => Self::KeyU,
            W::KeyV => Self::KeyV,
            W::KeyW => Self::KeyW,
            W::KeyX => Self::KeyX,
            W::KeyY => Self::KeyY,
            W::KeyZ => Self::KeyZ,

            W::ArrowUp => Self::ArrowUp,
            W::ArrowDown => Self::ArrowDown,
            W::ArrowLeft => Self::ArrowLeft,
            W::ArrowRight => Self::ArrowRight,

            W::Space => Self::Space,
            W::Enter | W::NumpadEnter => Self::Enter,
            W::Escape => Self::Escape,
            W::Tab => Self::Tab,
            W::Backspace => Self::Backspace,
            W::Delete => Self::Delete,

            _ => Self::Unidentified,
        }
    }
}

/// Physical key to kit key, `None` for keys the kit does not model.
pub(crate) fn key_code(key: PhysicalKey) -> Option<KeyCode> {
    match key {
        PhysicalKey::Code(code) => match KeyCode::from(code) {
            KeyCode::Unidentified => None,
            mapped => Some(mapped),
        },
        PhysicalKey::Unidentified(_) => None,
    }
}

//=== Pointer =============================================================

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => Self::Left,
            WinitMouseButton::Right => Self::Right,
            WinitMouseButton::Middle => Self::Middle,
            _ => Self::Other,
        }
    }
}

impl From<TouchPhase> for PointerPhase {
    fn from(phase: TouchPhase) -> Self {
        match phase {
            TouchPhase::Started => Self::Began,
            TouchPhase::Moved => Self::Moved,
            TouchPhase::Ended => Self::Ended,
            TouchPhase::Cancelled => Self::Cancelled,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
