//=========================================================================
// Message Queue Trait
//=========================================================================
//
// Erases the message type of a `Vec<M>` so queues for unrelated types
// can share one HashMap.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use super::Message;

//=========================================================================

/// Type-erased view of one message queue.
pub(super) trait MessageQueue {
    /// Drops every queued message, keeping the allocation.
    fn clear_queue(&mut self);

    fn len(&self) -> usize;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<M: Message> MessageQueue for Vec<M> {
    fn clear_queue(&mut self) {
        self.clear();
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=========================================================================
// Tests
//=========================================================================
