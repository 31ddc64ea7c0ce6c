//=========================================================================
// Relay Component
//=========================================================================
//
// Forwarding handle that lets an entity present a component living on
// another entity as if it were local. Typical use: one shared input
// decoder on the coordinator's global entity, relayed into every
// gameplay entity that reads input.
//
//   entity B ── co_component::<T>() ──► B's own T?  ──► B's relay for T
//                                                          │ (weak)
//                                                          ▼
//                                                   entity A's T
//
// A relay never owns its target: dropping or removing the relay leaves
// the target alone, and a relay whose target is gone resolves to None.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

//=== Internal Dependencies ===============================================

use super::component::{Component, ComponentType};

//=== RelayComponent ======================================================

/// Weak reference to a component of type `T` owned by another entity.
pub struct RelayComponent<T: Component> {
    target: Weak<RefCell<T>>,
}

impl<T: Component> RelayComponent<T> {
    /// Relays `target` without taking ownership of it.
    pub fn new(target: &Rc<RefCell<T>>) -> Self {
        Self { target: Rc::downgrade(target) }
    }

    /// The relayed component, if its owner still holds it.
    pub fn target(&self) -> Option<Rc<RefCell<T>>> {
        self.target.upgrade()
    }

    pub fn is_alive(&self) -> bool {
        self.target.strong_count() > 0
    }

    pub fn target_type(&self) -> ComponentType {
        ComponentType::of::<T>()
    }

    pub(crate) fn into_weak(self) -> Weak<dyn Any> {
        self.target
    }
}

impl<T: Component> Clone for RelayComponent<T> {
    fn clone(&self) -> Self {
        Self { target: self.target.clone() }
    }
}

impl<T: Component> fmt::Debug for RelayComponent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayComponent")
            .field("target", &self.target_type().short_name())
            .field("alive", &self.is_alive())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
