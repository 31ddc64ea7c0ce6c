//=========================================================================
// Input Components
//=========================================================================
//
// Host glue forwards raw samples; input components hold the latest state
// and expose it to the other components of their entity (directly, or to
// other entities through a relay).
//
// Architecture:
//   host ──InputSender──> InputFeed ──update()──> input component ──> readers
//
//   PointerEventComponent    touch + mouse, one-frame retained slots
//   KeyboardEventComponent   held keys + per-frame transitions
//   MotionEventComponent     latest accelerometer / gyroscope sample
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod feed;
mod keyboard;
mod motion;
mod pointer;
mod retention;

//=== Public API ==========================================================

pub use event::{
    KeyCode, KeyEvent, Modifiers, MotionSample, MouseButton, PointerEvent, PointerPhase,
    PointerSource, Vector3,
};
pub use feed::{InputFeed, InputSender};
pub use keyboard::KeyboardEventComponent;
pub use motion::MotionEventComponent;
pub use pointer::PointerEventComponent;
pub use retention::RetainedEvent;
