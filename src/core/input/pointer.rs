//=========================================================================
// Pointer Input Component
//=========================================================================
//
// Latest touch / mouse events of one entity, split by phase:
//
//   began   finger down or button pressed
//   moved   drag or hover
//   ended   lift, release or cancellation
//
// Each slot follows the one-frame retention pattern (see `retention`):
// an event stays readable for the frame it arrives in and the next one.
//
// Register this component's system before any system that reads it so
// that readers see the samples drained in the same frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{PointerEvent, PointerPhase, PointerSource};
use super::feed::{InputFeed, InputSender};
use super::retention::RetainedEvent;
use crate::core::entity::{Component, Updatable};
use crate::core::node::Point;
use crate::core::system::FrameContext;

//=== PointerEventComponent ===============================================

/// Touch and mouse state for the entity it is attached to.
///
/// Samples arrive either through the [`InputSender`] returned by
/// [`sender`](Self::sender) (drained at the start of this component's
/// update) or through [`record`](Self::record) from code that already
/// holds the component.
#[derive(Debug, Default)]
pub struct PointerEventComponent {
    feed: InputFeed<PointerEvent>,
    began: RetainedEvent<PointerEvent>,
    moved: RetainedEvent<PointerEvent>,
    ended: RetainedEvent<PointerEvent>,
    latest: Option<PointerEvent>,
    active: Vec<PointerSource>,
}

impl PointerEventComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component whose feed holds at most `capacity` undrained samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { feed: InputFeed::bounded(capacity), ..Self::default() }
    }

    /// Handle for host callbacks.
    pub fn sender(&self) -> InputSender<PointerEvent> {
        self.feed.sender()
    }

    //--- Writing ----------------------------------------------------------

    /// Stores `event` in its phase slot as fresh.
    pub fn record(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Began => {
                if event.source != PointerSource::Cursor && !self.active.contains(&event.source) {
                    self.active.push(event.source);
                }
                self.began.set(event);
            }
            PointerPhase::Moved => self.moved.set(event),
            PointerPhase::Ended | PointerPhase::Cancelled => {
                self.active.retain(|source| *source != event.source);
                self.ended.set(event);
            }
        }
        self.latest = Some(event);
    }

    //--- Reading ----------------------------------------------------------

    pub fn began(&self) -> Option<&PointerEvent> {
        self.began.get()
    }

    pub fn moved(&self) -> Option<&PointerEvent> {
        self.moved.get()
    }

    /// Latest end or cancellation still retained.
    pub fn ended(&self) -> Option<&PointerEvent> {
        self.ended.get()
    }

    /// Most recent event of any phase; never cleared.
    pub fn latest(&self) -> Option<&PointerEvent> {
        self.latest.as_ref()
    }

    /// Where the last event of any phase happened.
    pub fn last_location(&self) -> Option<Point> {
        self.latest.map(|event| event.location)
    }

    /// Touches and mouse buttons currently down, in press order.
    pub fn active_pointers(&self) -> &[PointerSource] {
        &self.active
    }

    pub fn is_pointer_down(&self) -> bool {
        !self.active.is_empty()
    }
}

//--- Trait Implementations -----------------------------------------------

impl Component for PointerEventComponent {
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        Some(self)
    }
}

impl Updatable for PointerEventComponent {
    fn update(&mut self, frame: &mut FrameContext<'_>) {
        self.began.advance_frame();
        self.moved.advance_frame();
        self.ended.advance_frame();

        let samples = self.feed.drain();
        if !samples.is_empty() {
            trace!(
                target: "input",
                "frame {}: {} pointer samples for {:?}",
                frame.frame(),
                samples.len(),
                frame.entity_id()
            );
        }
        for event in samples {
            self.record(event);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::entity::Entity;
    use crate::core::input::MouseButton;
    use crate::core::scene::Scene;

    //--- Test Helpers -----------------------------------------------------

    fn touch(phase: PointerPhase, id: u64, x: f32) -> PointerEvent {
        PointerEvent::new(phase, Point::new(x, 0.0), PointerSource::Touch { id })
    }

    /// Records whether a `began` event was visible on each frame.
    #[derive(Default)]
    struct TapReader {
        seen: Vec<bool>,
    }

    impl Component for TapReader {
        fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }
    }

    impl Updatable for TapReader {
        fn update(&mut self, frame: &mut FrameContext<'_>) {
            let Some(pointer) = frame.co_component::<PointerEventComponent>() else {
                return;
            };
            self.seen.push(pointer.borrow().began().is_some());
        }
    }

    fn scene_with_reader() -> (Scene, Rc<RefCell<PointerEventComponent>>, Rc<RefCell<TapReader>>) {
        let mut scene = Scene::new("input");
        scene.register_system::<PointerEventComponent>();
        scene.register_system::<TapReader>();

        let entity = Entity::named("player").into_ref();
        let pointer = entity.borrow_mut().add_component(PointerEventComponent::new());
        let reader = entity.borrow_mut().add_component(TapReader::default());
        scene.add_entity(entity);

        (scene, pointer, reader)
    }

    //=====================================================================
    // Retention
    //=====================================================================

    #[test]
    fn recorded_event_survives_one_frame_boundary() {
        let (mut scene, pointer, _reader) = scene_with_reader();
        scene.update(0.016);

        // Written during frame K
        pointer.borrow_mut().record(touch(PointerPhase::Began, 1, 5.0));
        assert!(pointer.borrow().began().is_some());

        // Frame K+1
        scene.update(0.016);
        assert!(pointer.borrow().began().is_some());

        // Frame K+2
        scene.update(0.016);
        assert!(pointer.borrow().began().is_none());
        assert_eq!(pointer.borrow().last_location(), Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn fed_event_is_read_in_arrival_frame_and_next() {
        let (mut scene, pointer, reader) = scene_with_reader();
        let sender = pointer.borrow().sender();

        scene.update(0.016);
        assert!(sender.send(touch(PointerPhase::Began, 1, 0.0)));
        scene.update(0.016);
        scene.update(0.016);
        scene.update(0.016);

        assert_eq!(reader.borrow().seen, vec![false, true, true, false]);
    }

    #[test]
    fn refreshed_moves_stay_visible() {
        let (mut scene, pointer, _reader) = scene_with_reader();
        let sender = pointer.borrow().sender();

        for step in 0..5 {
            sender.send(touch(PointerPhase::Moved, 1, step as f32));
            scene.update(0.016);
            let moved = pointer.borrow().moved().copied();
            assert_eq!(moved.map(|e| e.location.x), Some(step as f32));
        }
    }

    //=====================================================================
    // Active Pointers
    //=====================================================================

    #[test]
    fn tracks_touches_and_buttons_until_they_end() {
        let mut pointer = PointerEventComponent::new();
        let left = PointerSource::Mouse(MouseButton::Left);

        pointer.record(touch(PointerPhase::Began, 1, 0.0));
        pointer.record(touch(PointerPhase::Began, 2, 0.0));
        pointer.record(PointerEvent::new(PointerPhase::Began, Point::ZERO, left));
        assert_eq!(pointer.active_pointers().len(), 3);

        pointer.record(touch(PointerPhase::Cancelled, 1, 0.0));
        pointer.record(touch(PointerPhase::Ended, 2, 0.0));
        assert_eq!(pointer.active_pointers(), &[left]);
        assert_eq!(pointer.ended().map(|e| e.phase), Some(PointerPhase::Ended));

        pointer.record(PointerEvent::new(PointerPhase::Ended, Point::ZERO, left));
        assert!(!pointer.is_pointer_down());
    }

    #[test]
    fn hover_is_not_an_active_pointer() {
        let mut pointer = PointerEventComponent::new();
        pointer.record(PointerEvent::new(PointerPhase::Moved, Point::new(3.0, 4.0), PointerSource::Cursor));

        assert!(!pointer.is_pointer_down());
        assert_eq!(pointer.latest().map(|e| e.source), Some(PointerSource::Cursor));
    }

    #[test]
    fn bounded_component_drops_overflow() {
        let pointer = PointerEventComponent::with_capacity(1);
        let sender = pointer.sender();

        assert!(sender.send(touch(PointerPhase::Moved, 1, 0.0)));
        assert!(!sender.send(touch(PointerPhase::Moved, 1, 1.0)));
    }
}
