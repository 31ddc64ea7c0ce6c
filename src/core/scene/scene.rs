//=========================================================================
// Scene
//=========================================================================
//
// Owns the entities and component systems of one loaded scene and
// dispatches their per-frame updates.
//
// Frame flow:
//   update(dt)
//     ├─ apply membership changes reported by entities
//     ├─ pause gate (all four sources clear?)
//     ├─ clear last frame's messages
//     └─ systems in registration order → members in insertion order
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::clock::FrameClock;
use super::pause::{PauseSource, PauseState};
use crate::core::entity::{Component, ComponentType, EntityId, EntityRef};
use crate::core::message_bus::MessageBus;
use crate::core::node::NodeHandle;
use crate::core::system::{ComponentSystem, MembershipChange, SystemInbox};
use crate::core::turn;

//=== Scene ===============================================================

/// A loaded scene: entities, ordered component systems and a pause gate.
pub struct Scene {
    name: String,
    root: Option<NodeHandle>,
    entities: Vec<(EntityId, EntityRef)>,
    global: Option<EntityId>,
    systems: Vec<ComponentSystem>,
    inbox: Rc<SystemInbox>,
    messages: MessageBus,
    pause: PauseState,
    clock: FrameClock,
    frames: u64,
}

impl Scene {
    //--- Construction -----------------------------------------------------

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
            entities: Vec::new(),
            global: None,
            systems: Vec::new(),
            inbox: Rc::new(SystemInbox::new()),
            messages: MessageBus::new(),
            pause: PauseState::new(),
            clock: FrameClock::new(),
            frames: 0,
        }
    }

    /// Sets the host node that represents the scene itself.
    pub fn with_root_node(mut self, root: NodeHandle) -> Self {
        self.root = Some(root);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root_node(&self) -> Option<&NodeHandle> {
        self.root.as_ref()
    }

    //--- Systems ----------------------------------------------------------

    /// Appends a system for components of type `T`.
    ///
    /// Registration order is update order: register a component type
    /// before any type that requires it. Returns `false` (and logs a
    /// warning) if a system for `T` already exists.
    pub fn register_system<T: Component>(&mut self) -> bool {
        self.register_system_of(ComponentType::of::<T>())
    }

    /// Type-erased form of [`register_system`](Self::register_system).
    ///
    /// Components of that type already present on scene entities join
    /// the new system immediately.
    pub fn register_system_of(&mut self, component_type: ComponentType) -> bool {
        self.apply_membership_changes();

        if self.system(component_type).is_some() {
            warn!(target: "scene", "{}: system for {} already registered", self.name, component_type);
            return false;
        }

        let mut system = ComponentSystem::new(component_type);
        for (id, entity) in &self.entities {
            let Ok(e) = entity.try_borrow() else {
                continue;
            };
            if let Some(handle) = e.component_handle(component_type) {
                system.insert(*id, entity, Rc::downgrade(&handle));
            }
        }

        debug!(
            target: "scene",
            "{}: registered system {} at position {}",
            self.name,
            component_type,
            self.systems.len()
        );
        self.systems.push(system);
        true
    }

    /// Component types of the registered systems, in update order.
    pub fn system_order(&self) -> Vec<ComponentType> {
        self.systems.iter().map(ComponentSystem::component_type).collect()
    }

    pub fn system(&self, component_type: ComponentType) -> Option<&ComponentSystem> {
        self.systems.iter().find(|s| s.component_type() == component_type)
    }

    pub fn systems(&self) -> &[ComponentSystem] {
        &self.systems
    }

    //--- Entities ---------------------------------------------------------

    /// Adds `entity` to the scene and its components to matching systems.
    ///
    /// Components added to or removed from the entity later are picked up
    /// at the start of the next frame. Returns `false` if the entity is
    /// already in the scene or is currently borrowed.
    pub fn add_entity(&mut self, entity: EntityRef) -> bool {
        self.apply_membership_changes();

        let Ok(mut e) = entity.try_borrow_mut() else {
            warn!(target: "scene", "{}: entity is borrowed and cannot be added", self.name);
            return false;
        };

        let id = e.id();
        if self.contains_entity(id) {
            warn!(target: "scene", "{}: {} is already in the scene", self.name, e);
            return false;
        }

        e.attach_inbox(&self.inbox);
        for (component_type, handle) in e.component_handles() {
            if let Some(system) = self.systems.iter_mut().find(|s| s.component_type() == component_type) {
                system.insert(id, &entity, Rc::downgrade(&handle));
            }
        }
        debug!(target: "scene", "{}: added {}", self.name, e);
        drop(e);

        self.entities.push((id, entity));
        true
    }

    /// Removes an entity from the scene and from every system.
    ///
    /// The entity and its components survive if the caller holds on to
    /// the returned reference.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<EntityRef> {
        self.apply_membership_changes();

        let pos = self.entities.iter().position(|(eid, _)| *eid == id)?;
        let (_, entity) = self.entities.remove(pos);

        for system in &mut self.systems {
            system.remove_entity(id);
        }

        if let Ok(mut e) = entity.try_borrow_mut() {
            e.detach_inbox(&self.inbox);
        } else {
            warn!(target: "scene", "{}: entity {} removed while borrowed", self.name, id);
        }

        if self.global == Some(id) {
            self.global = None;
        }
        debug!(target: "scene", "{}: removed entity {}", self.name, id);
        Some(entity)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.iter().any(|(eid, _)| *eid == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<EntityRef> {
        self.entities
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, e)| e.clone())
    }

    /// First entity with the given name, in insertion order.
    pub fn entity_named(&self, name: &str) -> Option<EntityRef> {
        self.entities
            .iter()
            .find(|(_, e)| e.try_borrow().is_ok_and(|e| e.name() == Some(name)))
            .map(|(_, e)| e.clone())
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityRef> {
        self.entities.iter().map(|(_, e)| e)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    //--- Global Entity ----------------------------------------------------

    /// Adds the coordinator's persistent entity to this scene.
    ///
    /// A different entity previously installed as global is removed from
    /// the scene first.
    pub(crate) fn set_global_entity(&mut self, entity: EntityRef) {
        let Ok(id) = entity.try_borrow().map(|e| e.id()) else {
            warn!(target: "scene", "{}: global entity is borrowed", self.name);
            return;
        };
        if let Some(previous) = self.global.filter(|previous| *previous != id) {
            debug!(target: "scene", "{}: replacing global entity {}", self.name, previous);
            self.remove_entity(previous);
        }
        if self.contains_entity(id) || self.add_entity(entity) {
            self.global = Some(id);
        }
    }

    /// The entity shared across all game states, if this scene has one.
    pub fn global_entity(&self) -> Option<EntityRef> {
        self.global.and_then(|id| self.entity(id))
    }

    //--- Frame Update -----------------------------------------------------

    /// Runs one frame with an externally measured delta time.
    ///
    /// Returns `false` if the pause gate skipped the frame.
    pub fn update(&mut self, delta_time: f64) -> bool {
        self.apply_membership_changes();

        if !self.pause.should_update() {
            trace!(target: "scene", "{}: paused by {:?}", self.name, self.pause.active_sources());
            return false;
        }

        self.messages.clear_all();
        self.frames += 1;
        for system in &mut self.systems {
            system.update(delta_time, self.frames, &mut self.messages);
        }
        true
    }

    /// Runs one frame, deriving the delta from a host timestamp (seconds).
    ///
    /// The clock advances even when the frame is skipped by the pause gate.
    pub fn update_at(&mut self, current_time: f64) -> bool {
        let delta_time = self.clock.tick(current_time);
        self.update(delta_time)
    }

    /// Number of frames actually dispatched.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    //--- Turn Cycle -------------------------------------------------------

    /// Runs begin/update/end turn phases over every turn-based component
    /// of every scene entity, with or without a registered system.
    ///
    /// Entities are visited in insertion order, their components in the
    /// order they were added. Not gated by pause. Messages posted by turn
    /// hooks stay on the bus until the next dispatched frame.
    pub fn run_turn_cycle(&mut self, turns: u64) -> usize {
        self.apply_membership_changes();
        let participants = self.turn_participants();
        turn::run_turn_cycle(&participants, turns, self.frames, &mut self.messages)
    }

    //--- Pause ------------------------------------------------------------

    /// Sets one pause source. Returns `true` if the flag changed.
    pub fn set_paused(&mut self, source: PauseSource, paused: bool) -> bool {
        let changed = self.pause.set(source, paused);
        if changed {
            debug!(target: "scene", "{}: {:?} pause {}", self.name, source, if paused { "set" } else { "cleared" });
        }
        changed
    }

    pub fn is_paused_by(&self, source: PauseSource) -> bool {
        self.pause.is_paused_by(source)
    }

    pub fn should_update(&self) -> bool {
        self.pause.should_update()
    }

    pub fn pause_state(&self) -> &PauseState {
        &self.pause
    }

    //--- Messages ---------------------------------------------------------

    /// Messages posted during the last dispatched frame (or since).
    pub fn messages(&self) -> &MessageBus {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageBus {
        &mut self.messages
    }

    //--- Internal Helpers -------------------------------------------------

    fn turn_participants(&self) -> Vec<turn::TurnParticipant> {
        let mut participants = Vec::new();
        for (id, entity) in &self.entities {
            let Ok(e) = entity.try_borrow() else {
                warn!(target: "scene", "{}: entity {} is borrowed, skipped for this turn", self.name, id);
                continue;
            };
            participants.extend(e.component_handles().into_iter().map(|(_, c)| (entity.clone(), c)));
        }
        participants
    }

    fn apply_membership_changes(&mut self) {
        for change in self.inbox.take() {
            match change {
                MembershipChange::Added { entity, component_type, component } => {
                    let Some((_, entity_ref)) = self.entities.iter().find(|(id, _)| *id == entity) else {
                        continue;
                    };
                    if let Some(system) = self.systems.iter_mut().find(|s| s.component_type() == component_type) {
                        system.insert(entity, entity_ref, component);
                    }
                }
                MembershipChange::Removed { entity, component_type } => {
                    if let Some(system) = self.systems.iter_mut().find(|s| s.component_type() == component_type) {
                        system.remove_entity(entity);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("systems", &self.systems)
            .field("pause", &self.pause.active_sources())
            .field("frames", &self.frames)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{Entity, RelayComponent, Updatable};
    use crate::core::system::FrameContext;
    use crate::core::turn::TurnBased;
    use std::cell::RefCell;

    //--- Test Components --------------------------------------------------

    /// Writes the current frame number every update.
    #[derive(Default)]
    struct Producer {
        frame: u64,
    }

    impl Component for Producer {
        fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }
    }

    impl Updatable for Producer {
        fn update(&mut self, frame: &mut FrameContext<'_>) {
            self.frame = frame.frame();
        }
    }

    /// Records (own frame, producer frame) pairs.
    #[derive(Default)]
    struct Consumer {
        seen: Vec<(u64, u64)>,
    }

    impl Component for Consumer {
        fn required_components(&self) -> Vec<ComponentType> {
            vec![ComponentType::of::<Producer>()]
        }

        fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }
    }

    impl Updatable for Consumer {
        fn update(&mut self, frame: &mut FrameContext<'_>) {
            let Some(producer) = frame.co_component::<Producer>() else {
                return;
            };
            self.seen.push((frame.frame(), producer.borrow().frame));
        }
    }

    #[derive(Default)]
    struct Ticker {
        ticks: u32,
        total_time: f64,
    }

    impl Component for Ticker {
        fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }
    }

    impl Updatable for Ticker {
        fn update(&mut self, frame: &mut FrameContext<'_>) {
            self.ticks += 1;
            self.total_time += frame.delta_time();
        }
    }

    /// Adds a Ticker to its own entity during its first update.
    #[derive(Default)]
    struct Spawner {
        done: bool,
    }

    impl Component for Spawner {
        fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }
    }

    impl Updatable for Spawner {
        fn update(&mut self, frame: &mut FrameContext<'_>) {
            if self.done {
                return;
            }
            if let Ok(mut entity) = frame.entity().try_borrow_mut() {
                entity.add_component(Ticker::default());
                self.done = true;
            }
        }
    }

    struct TurnCounter {
        turns: Rc<RefCell<Vec<u64>>>,
    }

    impl Component for TurnCounter {
        fn as_turn_based(&mut self) -> Option<&mut dyn TurnBased> {
            Some(self)
        }
    }

    impl TurnBased for TurnCounter {
        fn update_turn(&mut self, turns: u64, _ctx: &mut FrameContext<'_>) {
            self.turns.borrow_mut().push(turns);
        }
    }

    /// Turn-only component recording its phases into a shared log.
    struct TurnOnly {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Component for TurnOnly {
        fn as_turn_based(&mut self) -> Option<&mut dyn TurnBased> {
            Some(self)
        }
    }

    impl TurnBased for TurnOnly {
        fn begin_turn(&mut self, _turns: u64, _ctx: &mut FrameContext<'_>) {
            self.log.borrow_mut().push(format!("begin {}", self.tag));
        }
        fn end_turn(&mut self, _turns: u64, _ctx: &mut FrameContext<'_>) {
            self.log.borrow_mut().push(format!("end {}", self.tag));
        }
    }

    fn pipeline_entity() -> (EntityRef, Rc<RefCell<Consumer>>) {
        let entity = Entity::named("pipeline").into_ref();
        entity.borrow_mut().add_component(Producer::default());
        let consumer = entity.borrow_mut().add_component(Consumer::default());
        (entity, consumer)
    }

    //=====================================================================
    // System Ordering
    //=====================================================================

    #[test]
    fn dependency_first_sees_current_frame_data() {
        let mut scene = Scene::new("ordered");
        scene.register_system::<Producer>();
        scene.register_system::<Consumer>();
        let (entity, consumer) = pipeline_entity();
        scene.add_entity(entity);

        scene.update(0.016);
        scene.update(0.016);

        assert_eq!(consumer.borrow().seen, vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn dependency_last_sees_previous_frame_data() {
        let mut scene = Scene::new("reversed");
        scene.register_system::<Consumer>();
        scene.register_system::<Producer>();
        let (entity, consumer) = pipeline_entity();
        scene.add_entity(entity);

        scene.update(0.016);
        scene.update(0.016);

        assert_eq!(consumer.borrow().seen, vec![(1, 0), (2, 1)]);
    }

    #[test]
    fn duplicate_system_registration_is_rejected() {
        let mut scene = Scene::new("dup");
        assert!(scene.register_system::<Ticker>());
        assert!(!scene.register_system::<Ticker>());
        assert_eq!(scene.system_order(), vec![ComponentType::of::<Ticker>()]);
    }

    #[test]
    fn types_without_system_are_never_updated() {
        let mut scene = Scene::new("exempt");
        let entity = Entity::new().into_ref();
        let ticker = entity.borrow_mut().add_component(Ticker::default());
        scene.add_entity(entity);

        scene.update(0.016);
        assert_eq!(ticker.borrow().ticks, 0);
    }

    //=====================================================================
    // Membership Synchronization
    //=====================================================================

    #[test]
    fn late_system_registration_backfills_members() {
        let mut scene = Scene::new("late");
        let entity = Entity::new().into_ref();
        let ticker = entity.borrow_mut().add_component(Ticker::default());
        scene.add_entity(entity);

        scene.register_system::<Ticker>();
        scene.update(0.016);
        assert_eq!(ticker.borrow().ticks, 1);
    }

    #[test]
    fn components_added_after_entity_join_next_frame() {
        let mut scene = Scene::new("sync");
        scene.register_system::<Ticker>();
        let entity = Entity::new().into_ref();
        scene.add_entity(entity.clone());

        let ticker = entity.borrow_mut().add_component(Ticker::default());
        scene.update(0.016);
        assert_eq!(ticker.borrow().ticks, 1);

        entity.borrow_mut().remove_component::<Ticker>();
        scene.update(0.016);
        assert_eq!(ticker.borrow().ticks, 1);
        assert!(scene.system(ComponentType::of::<Ticker>()).is_some_and(|s| s.is_empty()));
    }

    #[test]
    fn component_added_mid_frame_starts_next_frame() {
        let mut scene = Scene::new("spawn");
        scene.register_system::<Spawner>();
        scene.register_system::<Ticker>();
        let entity = Entity::new().into_ref();
        entity.borrow_mut().add_component(Spawner::default());
        scene.add_entity(entity.clone());

        scene.update(0.016);
        let ticker = entity.borrow().component::<Ticker>().expect("spawned");
        assert_eq!(ticker.borrow().ticks, 0);

        scene.update(0.016);
        assert_eq!(ticker.borrow().ticks, 1);
    }

    #[test]
    fn removed_entity_stops_updating() {
        let mut scene = Scene::new("remove");
        scene.register_system::<Ticker>();
        let entity = Entity::new().into_ref();
        let ticker = entity.borrow_mut().add_component(Ticker::default());
        let id = entity.borrow().id();
        scene.add_entity(entity);

        scene.update(0.016);
        let removed = scene.remove_entity(id).expect("was in scene");
        scene.update(0.016);

        assert_eq!(ticker.borrow().ticks, 1);
        assert!(!scene.contains_entity(id));

        // No longer reporting to this scene.
        removed.borrow_mut().remove_component::<Ticker>();
        scene.update(0.016);
    }

    #[test]
    fn adding_entity_twice_is_rejected() {
        let mut scene = Scene::new("twice");
        let entity = Entity::named("solo").into_ref();
        assert!(scene.add_entity(entity.clone()));
        assert!(!scene.add_entity(entity));
        assert_eq!(scene.entity_count(), 1);
        assert!(scene.entity_named("solo").is_some());
    }

    //=====================================================================
    // Pause Gate
    //=====================================================================

    #[test]
    fn any_pause_source_skips_the_frame() {
        for source in PauseSource::ALL {
            let mut scene = Scene::new("paused");
            scene.register_system::<Ticker>();
            let entity = Entity::new().into_ref();
            let ticker = entity.borrow_mut().add_component(Ticker::default());
            scene.add_entity(entity);

            scene.set_paused(source, true);
            assert!(!scene.update(0.016));
            assert_eq!(ticker.borrow().ticks, 0);

            scene.set_paused(source, false);
            assert!(scene.update(0.016));
            assert_eq!(ticker.borrow().ticks, 1);
        }
    }

    #[test]
    fn resume_does_not_catch_up_paused_time() {
        let mut scene = Scene::new("clock");
        scene.register_system::<Ticker>();
        let entity = Entity::new().into_ref();
        let ticker = entity.borrow_mut().add_component(Ticker::default());
        scene.add_entity(entity);

        scene.update_at(0.0);
        scene.set_paused(PauseSource::System, true);
        scene.update_at(1.0);
        scene.update_at(2.0);
        scene.set_paused(PauseSource::System, false);
        scene.update_at(2.5);

        assert_eq!(ticker.borrow().ticks, 2);
        assert!((ticker.borrow().total_time - 0.5).abs() < 1e-9);
        assert_eq!(scene.frame_count(), 2);
    }

    //=====================================================================
    // Turns, Relays & Global Entity
    //=====================================================================

    #[test]
    fn turn_cycle_reaches_registered_turn_components() {
        let turns = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new("turns");
        scene.register_system::<TurnCounter>();
        let entity = Entity::new().into_ref();
        entity.borrow_mut().add_component(TurnCounter { turns: turns.clone() });
        scene.add_entity(entity);

        scene.set_paused(PauseSource::Player, true);
        assert_eq!(scene.run_turn_cycle(2), 1);
        assert_eq!(*turns.borrow(), vec![2]);
    }

    #[test]
    fn turn_cycle_reaches_components_without_a_system() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new("turn only");

        let first = Entity::new().into_ref();
        first.borrow_mut().add_component(TurnOnly { tag: "a", log: log.clone() });
        first.borrow_mut().add_component(Ticker::default());
        let second = Entity::new().into_ref();
        second.borrow_mut().add_component(TurnOnly { tag: "b", log: log.clone() });
        scene.add_entity(first);
        scene.add_entity(second);

        assert!(scene.systems().is_empty());
        assert_eq!(scene.run_turn_cycle(1), 2);
        assert_eq!(*log.borrow(), vec!["begin a", "begin b", "end a", "end b"]);
    }

    #[test]
    fn turn_cycle_skips_removed_components() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new("turn removal");
        let entity = Entity::new().into_ref();
        entity.borrow_mut().add_component(TurnOnly { tag: "a", log: log.clone() });
        scene.add_entity(entity.clone());

        entity.borrow_mut().remove_component::<TurnOnly>();
        assert_eq!(scene.run_turn_cycle(1), 0);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn replacing_global_entity_removes_the_previous_one() {
        let mut scene = Scene::new("globals");
        let old = Entity::named("old global").into_ref();
        let new = Entity::named("new global").into_ref();
        let old_id = old.borrow().id();

        scene.set_global_entity(old.clone());
        scene.set_global_entity(old);
        assert_eq!(scene.entity_count(), 1);

        scene.set_global_entity(new.clone());
        assert!(!scene.contains_entity(old_id));
        assert_eq!(scene.entity_count(), 1);
        assert!(scene.global_entity().is_some_and(|g| Rc::ptr_eq(&g, &new)));
    }

    #[test]
    fn relayed_global_component_stays_updatable() {
        let mut scene = Scene::new("relay");
        scene.register_system::<Producer>();
        scene.register_system::<Consumer>();

        let global = Entity::named("global").into_ref();
        let producer = global.borrow_mut().add_component(Producer::default());
        scene.set_global_entity(global.clone());

        let local = Entity::named("local").into_ref();
        local.borrow_mut().add_relay(RelayComponent::new(&producer));
        let consumer = local.borrow_mut().add_component(Consumer::default());
        scene.add_entity(local.clone());

        scene.update(0.016);
        assert_eq!(consumer.borrow().seen, vec![(1, 1)]);

        local.borrow_mut().remove_relay::<Producer>();
        scene.update(0.016);
        assert_eq!(consumer.borrow().seen.len(), 1);
        assert_eq!(producer.borrow().frame, 2);
        assert!(scene.global_entity().is_some_and(|g| Rc::ptr_eq(&g, &global)));
    }
}
