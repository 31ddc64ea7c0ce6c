//=========================================================================
// One-Frame Event Retention
//=========================================================================
//
// Two-phase clearing for "latest event" slots:
//
// ```text
//   frame K     set(e)            fresh    -> visible
//   frame K+1   advance_frame()   stale    -> still visible
//   frame K+2   advance_frame()   cleared  -> absent
// ```
//
// Writing again before the slot clears makes it fresh again, so an event
// refreshed every frame never disappears.
//
//=========================================================================

/// Slot holding the latest event of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedEvent<E> {
    event: Option<E>,
    stale: bool,
}

impl<E> RetainedEvent<E> {
    pub const fn new() -> Self {
        Self { event: None, stale: false }
    }

    /// Stores `event` as fresh, replacing any previous one.
    pub fn set(&mut self, event: E) {
        self.event = Some(event);
        self.stale = false;
    }

    pub fn get(&self) -> Option<&E> {
        self.event.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.event.is_some()
    }

    /// True if the event has already survived one frame boundary.
    pub fn is_stale(&self) -> bool {
        self.event.is_some() && self.stale
    }

    /// Frame boundary: clears a stale event, marks a fresh one stale.
    pub fn advance_frame(&mut self) {
        if self.event.is_none() {
            return;
        }
        if self.stale {
            self.event = None;
            self.stale = false;
        } else {
            self.stale = true;
        }
    }

    /// Removes the event immediately.
    pub fn clear(&mut self) -> Option<E> {
        self.stale = false;
        self.event.take()
    }
}

impl<E> Default for RetainedEvent<E> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
