//=========================================================================
// Frame Context
//=========================================================================
//
// What a component sees while it updates: the frame's delta time, its
// own entity (for co-component lookups) and the scene's message bus.
// Turn phases receive the same context with a zero delta time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::entity::{Component, EntityId, EntityRef};
use crate::core::message_bus::{Message, MessageBus};
use crate::core::state::{StateKey, StateRequest};

//=== FrameContext ========================================================

/// Per-component view of the current frame.
pub struct FrameContext<'a> {
    delta_time: f64,
    frame: u64,
    entity: &'a EntityRef,
    messages: &'a mut MessageBus,
}

impl<'a> FrameContext<'a> {
    pub(crate) fn new(
        delta_time: f64,
        frame: u64,
        entity: &'a EntityRef,
        messages: &'a mut MessageBus,
    ) -> Self {
        Self { delta_time, frame, entity, messages }
    }

    //--- Time -------------------------------------------------------------

    /// Seconds since the previous dispatched frame.
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Number of the frame being dispatched (first frame is 1).
    pub fn frame(&self) -> u64 {
        self.frame
    }

    //--- Entity -----------------------------------------------------------

    /// The entity owning the component being updated.
    pub fn entity(&self) -> &EntityRef {
        self.entity
    }

    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity.try_borrow().ok().map(|e| e.id())
    }

    /// Looks up a co-component (local, then relayed) on the entity.
    ///
    /// Returns `None` if the component is absent or the entity is
    /// currently borrowed elsewhere; callers skip the dependent work for
    /// this frame.
    pub fn co_component<T: Component>(&self) -> Option<Rc<RefCell<T>>> {
        self.entity.try_borrow().ok()?.co_component::<T>()
    }

    //--- Messages ---------------------------------------------------------

    /// Posts a message readable by later components this frame.
    pub fn post<M: Message>(&mut self, message: M) {
        self.messages.post(message);
    }

    /// Messages posted so far this frame.
    pub fn messages(&self) -> &MessageBus {
        self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageBus {
        self.messages
    }

    /// Asks the coordinator to enter `state` once this frame is over.
    ///
    /// The request is validated like any other transition; an invalid
    /// request is logged and dropped.
    pub fn request_state<S: StateKey>(&mut self, state: S) {
        self.messages.post(StateRequest(state));
    }
}
