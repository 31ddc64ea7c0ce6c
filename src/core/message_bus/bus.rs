//=========================================================================
// Message Bus
//=========================================================================
//
// One queue per message type, keyed by TypeId.
//
// Pattern: post → read (N consumers) / drain (one owner) → clear → repeat
//
// Everything runs on the update thread, so messages only need to be
// 'static; they are never sent across threads.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::TypeId;
use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::message_queue::MessageQueue;

//=== Public API ==========================================================

/// Marker trait for types that can travel on the [`MessageBus`].
///
/// Implemented for every `'static` type.
pub trait Message: 'static {}

impl<T: 'static> Message for T {}

//=========================================================================

/// Per-frame message queues shared by every component in a scene.
///
/// Components post messages while they update; components later in the
/// system order can read them in the same frame, and the coordinator
/// drains the ones addressed to it (such as state requests) once the
/// frame is over. The scene clears every queue when the next frame
/// starts.
#[derive(Default)]
pub struct MessageBus {
    queues: HashMap<TypeId, Box<dyn MessageQueue>>,
}

impl MessageBus {
    pub fn new() -> Self {
        Self { queues: HashMap::new() }
    }

    //--- Message Operations -----------------------------------------------

    /// Appends a message to the queue for its type.
    pub fn post<M: Message>(&mut self, message: M) {
        let queue = self
            .queues
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Box::new(Vec::<M>::new()));

        // The entry for TypeId::of::<M>() is always a Vec<M>.
        if let Some(queue) = queue.as_any_mut().downcast_mut::<Vec<M>>() {
            queue.push(message);
        }
    }

    /// Returns every queued message of type `M`, oldest first.
    pub fn read<M: Message>(&self) -> &[M] {
        self.queue::<M>().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Removes and returns every queued message of type `M`.
    pub fn drain<M: Message>(&mut self) -> Vec<M> {
        self.queues
            .get_mut(&TypeId::of::<M>())
            .and_then(|q| q.as_any_mut().downcast_mut::<Vec<M>>())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    //--- Query API --------------------------------------------------------

    pub fn has_messages<M: Message>(&self) -> bool {
        self.count::<M>() > 0
    }

    pub fn count<M: Message>(&self) -> usize {
        self.queue::<M>().map_or(0, Vec::len)
    }

    /// Total number of queued messages across all types.
    pub fn total(&self) -> usize {
        self.queues.values().map(|q| q.len()).sum()
    }

    //--- Clearing ---------------------------------------------------------

    /// Clears the queue for `M`, keeping its allocation.
    pub fn clear<M: Message>(&mut self) {
        if let Some(queue) = self.queues.get_mut(&TypeId::of::<M>()) {
            queue.clear_queue();
        }
    }

    /// Clears every queue, keeping the allocations for the next frame.
    pub fn clear_all(&mut self) {
        for queue in self.queues.values_mut() {
            queue.clear_queue();
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn queue<M: Message>(&self) -> Option<&Vec<M>> {
        self.queues
            .get(&TypeId::of::<M>())
            .and_then(|q| q.as_any().downcast_ref::<Vec<M>>())
    }
}

//=========================================================================
// Tests
//=========================================================================
