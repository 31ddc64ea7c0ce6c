//=========================================================================
// Keyboard Input Component
//=========================================================================
//
// Key state with per-frame transitions.
//
// Architecture:
//   KeyEvent → InputFeed → update() → HashSets (held / pressed / released)
//
// Frame lifecycle, run by the component's update:
//   clear transitions → drain feed → apply events → query
//
// Held keys survive frame boundaries; pressed/released sets only describe
// the frame in which the transition was drained.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{KeyCode, KeyEvent, Modifiers};
use super::feed::{InputFeed, InputSender};
use crate::core::entity::{Component, Updatable};
use crate::core::system::FrameContext;

//=== KeyboardEventComponent ==============================================

/// Keyboard state for the entity it is attached to.
#[derive(Debug, Default)]
pub struct KeyboardEventComponent {
    feed: InputFeed<KeyEvent>,

    //--- Persistent State -------------------------------------------------
    keys_down: HashSet<KeyCode>,
    modifiers: Modifiers,

    //--- Frame Transitions ------------------------------------------------
    pressed_this_frame: HashSet<KeyCode>,
    released_this_frame: HashSet<KeyCode>,
}

impl KeyboardEventComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component whose feed holds at most `capacity` undrained events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { feed: InputFeed::bounded(capacity), ..Self::default() }
    }

    /// Handle for host callbacks.
    pub fn sender(&self) -> InputSender<KeyEvent> {
        self.feed.sender()
    }

    //--- Frame Processing -------------------------------------------------

    fn clear_transitions(&mut self) {
        self.pressed_this_frame.clear();
        self.released_this_frame.clear();
    }

    /// Applies `event` to the current frame's state.
    ///
    /// A repeated `Down` for a held key and an `Up` for a key that is not
    /// held change nothing.
    pub fn apply(&mut self, event: KeyEvent) {
        self.modifiers = event.modifiers();
        match event {
            KeyEvent::Down { key, .. } => {
                if self.keys_down.insert(key) {
                    self.pressed_this_frame.insert(key);
                }
            }
            KeyEvent::Up { key, .. } => {
                if self.keys_down.remove(&key) {
                    self.released_this_frame.insert(key);
                }
            }
            KeyEvent::ModifiersChanged(_) => {}
        }
    }

    //=====================================================================
    // Queries
    //=====================================================================

    /// Key went down this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_this_frame.contains(&key)
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Key went up this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.released_this_frame.contains(&key)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }

    pub fn keys_pressed(&self) -> impl Iterator<Item = &KeyCode> {
        self.pressed_this_frame.iter()
    }

    pub fn keys_released(&self) -> impl Iterator<Item = &KeyCode> {
        self.released_this_frame.iter()
    }

    /// True if any key is held.
    pub fn any_key_down(&self) -> bool {
        !self.keys_down.is_empty()
    }
}

//--- Trait Implementations -----------------------------------------------

impl Component for KeyboardEventComponent {
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for KeyboardEventComponent {
    fn update(&mut self, frame: &mut FrameContext<'_>) {
        self.clear_transitions();

        let events = self.feed.drain();
        if !events.is_empty() {
            trace!(target: "input", "frame {}: {} key events", frame.frame(), events.len());
        }
        for event in events {
            self.apply(event);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
