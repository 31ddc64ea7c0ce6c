//=========================================================================
// Motion Input Component
//=========================================================================
//
// Latest accelerometer / gyroscope sample of one entity and the change
// since the sample before it. Unlike pointer slots, the latest sample is
// never cleared: sensors report continuously and a missing sample means
// "unchanged".
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{MotionSample, Vector3};
use super::feed::{InputFeed, InputSender};
use crate::core::entity::{Component, Updatable};
use crate::core::system::FrameContext;

//=== MotionEventComponent ================================================

/// Device motion for the entity it is attached to.
#[derive(Debug, Default)]
pub struct MotionEventComponent {
    feed: InputFeed<MotionSample>,
    latest: Option<MotionSample>,
    previous: Option<MotionSample>,
    updated_on_frame: Option<u64>,
    current_frame: u64,
}

impl MotionEventComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component whose feed holds at most `capacity` undrained samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { feed: InputFeed::bounded(capacity), ..Self::default() }
    }

    /// Handle for host callbacks.
    pub fn sender(&self) -> InputSender<MotionSample> {
        self.feed.sender()
    }

    /// Stores `sample` as the latest reading.
    pub fn record(&mut self, sample: MotionSample) {
        self.previous = self.latest.replace(sample);
        self.updated_on_frame = Some(self.current_frame);
    }

    pub fn latest(&self) -> Option<&MotionSample> {
        self.latest.as_ref()
    }

    pub fn previous(&self) -> Option<&MotionSample> {
        self.previous.as_ref()
    }

    /// Acceleration change between the two latest samples.
    ///
    /// Zero until two samples have arrived.
    pub fn acceleration_delta(&self) -> Vector3 {
        match (&self.latest, &self.previous) {
            (Some(latest), Some(previous)) => latest.acceleration.delta(&previous.acceleration),
            _ => Vector3::ZERO,
        }
    }

    /// Rotation-rate change between the two latest samples.
    pub fn rotation_delta(&self) -> Vector3 {
        match (&self.latest, &self.previous) {
            (Some(latest), Some(previous)) => latest.rotation_rate.delta(&previous.rotation_rate),
            _ => Vector3::ZERO,
        }
    }

    /// True if a sample arrived during the latest update.
    pub fn is_fresh(&self) -> bool {
        self.updated_on_frame == Some(self.current_frame)
    }
}

//--- Trait Implementations -----------------------------------------------

impl Component for MotionEventComponent {
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for MotionEventComponent {
    fn update(&mut self, frame: &mut FrameContext<'_>) {
        self.current_frame = frame.frame();

        let samples = self.feed.drain();
        if !samples.is_empty() {
            trace!(target: "input", "frame {}: {} motion samples", frame.frame(), samples.len());
        }
        for sample in samples {
            self.record(sample);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
