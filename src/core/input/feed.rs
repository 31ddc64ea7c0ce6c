//=========================================================================
// Input Feeds
//=========================================================================
//
// Channel between host callbacks and an input component.
//
// ```text
//   host callback ──InputSender::send()──> [crossbeam channel] ──drain()──> component
//   (any time)          cloneable                                   (its update)
// ```
//
// The host keeps only senders, never component references, so an input
// callback can fire while the component is borrowed by the frame loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use log::{trace, warn};

//=== InputFeed ===========================================================

/// Receiving end of an input channel, owned by an input component.
pub struct InputFeed<E> {
    sender: Sender<E>,
    receiver: Receiver<E>,
}

impl<E> InputFeed<E> {
    /// Feed without a capacity limit.
    pub fn unbounded() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Feed holding at most `capacity` undrained samples; further samples
    /// are dropped with a warning until the component drains it.
    pub fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// New handle for posting samples into this feed.
    pub fn sender(&self) -> InputSender<E> {
        InputSender { sender: self.sender.clone() }
    }

    /// Takes every pending sample, oldest first.
    pub fn drain(&self) -> Vec<E> {
        let samples: Vec<E> = self.receiver.try_iter().collect();
        if !samples.is_empty() {
            trace!(target: "input", "drained {} samples", samples.len());
        }
        samples
    }

    /// Number of samples waiting to be drained.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<E> Default for InputFeed<E> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<E> std::fmt::Debug for InputFeed<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputFeed")
            .field("pending", &self.receiver.len())
            .field("capacity", &self.receiver.capacity())
            .finish()
    }
}

//=== InputSender =========================================================

/// Posting end of an [`InputFeed`]. Cheap to clone.
pub struct InputSender<E> {
    sender: Sender<E>,
}

impl<E> InputSender<E> {
    /// Posts `sample` without blocking.
    ///
    /// Returns `false` when the sample was dropped: the feed is full or
    /// its component no longer exists.
    pub fn send(&self, sample: E) -> bool {
        match self.sender.try_send(sample) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!(
                    target: "input",
                    "input feed full ({} pending), sample dropped",
                    self.sender.len()
                );
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                trace!(target: "input", "input feed disconnected, sample dropped");
                false
            }
        }
    }
}

impl<E> Clone for InputSender<E> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<E> std::fmt::Debug for InputSender<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSender").field("pending", &self.sender.len()).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
