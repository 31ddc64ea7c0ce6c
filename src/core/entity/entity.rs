//=========================================================================
// Entity
//=========================================================================
//
// Named bag of components plus an optional weak link to a host node.
//
// Architecture:
//   Entity
//     ├─ slots:  HashMap<TypeId, ComponentSlot>   (O(1) lookup by type)
//     ├─ order:  Vec<TypeId>                      (insertion order)
//     ├─ relays: HashMap<TypeId, RelaySlot>       (second-tier lookup)
//     └─ inboxes: Vec<Weak<SystemInbox>>          (scene membership)
//
// The entity is the only strong owner of its components. Component
// systems and relays hold weak references, so dropping the entity
// releases every component at once.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::component::{Component, ComponentType};
use super::relay::RelayComponent;
use crate::core::node::{NodeHandle, WeakNodeHandle};
use crate::core::system::{MembershipChange, SystemInbox};

//=== EntityId ============================================================

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    fn next() -> Self {
        Self(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared handle to an entity, as stored by scenes and the coordinator.
pub type EntityRef = Rc<RefCell<Entity>>;

//=== Slots ===============================================================

struct ComponentSlot {
    component_type: ComponentType,
    erased: Rc<RefCell<dyn Component>>,
    // Same allocation as `erased`, kept for typed downcasts.
    typed: Rc<dyn Any>,
}

struct RelaySlot {
    target_type: ComponentType,
    target: Weak<dyn Any>,
}

//=== Entity ==============================================================

/// Container of components, one instance per concrete component type.
pub struct Entity {
    id: EntityId,
    name: Option<String>,
    node: Option<WeakNodeHandle>,
    slots: HashMap<TypeId, ComponentSlot>,
    order: Vec<TypeId>,
    relays: HashMap<TypeId, RelaySlot>,
    inboxes: Vec<Weak<SystemInbox>>,
}

impl Entity {
    //--- Construction -----------------------------------------------------

    /// Creates an unnamed entity without a node.
    pub fn new() -> Self {
        Self {
            id: EntityId::next(),
            name: None,
            node: None,
            slots: HashMap::new(),
            order: Vec::new(),
            relays: HashMap::new(),
            inboxes: Vec::new(),
        }
    }

    /// Creates a named entity.
    pub fn named(name: impl Into<String>) -> Self {
        let mut entity = Self::new();
        entity.name = Some(name.into());
        entity
    }

    /// Links the entity to a host node (weakly).
    pub fn with_node(mut self, node: &NodeHandle) -> Self {
        self.set_node(Some(node));
        self
    }

    /// Wraps the entity into a shared [`EntityRef`].
    pub fn into_ref(self) -> EntityRef {
        Rc::new(RefCell::new(self))
    }

    //--- Identity ---------------------------------------------------------

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    //--- Node -------------------------------------------------------------

    /// The host node this entity represents, if it is still alive.
    pub fn node(&self) -> Option<NodeHandle> {
        self.node.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_node(&mut self, node: Option<&NodeHandle>) {
        self.node = node.map(Rc::downgrade);
    }

    //--- Adding & Removing ------------------------------------------------

    /// Adds `component`, replacing any existing component of the same type.
    ///
    /// The replaced instance (if any) gets `will_remove_from_entity` first.
    /// Missing required components are reported as a warning only; the
    /// component is added regardless. Scenes containing this entity pick
    /// the component up at their next frame.
    pub fn add_component<T: Component>(&mut self, component: T) -> Rc<RefCell<T>> {
        let component_type = ComponentType::of::<T>();

        if self.slots.contains_key(&component_type.id()) {
            debug!(target: "entity", "{}: replacing {}", self, component_type);
            self.remove_component_of_type(component_type);
        }

        let missing = self.missing_components(&component.required_components());
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            warn!(
                target: "entity",
                "{}: {} added without required components [{}]",
                self,
                component_type,
                names.join(", ")
            );
        }

        let typed = Rc::new(RefCell::new(component));
        let erased: Rc<RefCell<dyn Component>> = typed.clone();
        let any: Rc<dyn Any> = typed.clone();

        self.slots.insert(
            component_type.id(),
            ComponentSlot {
                component_type,
                erased: erased.clone(),
                typed: any,
            },
        );
        self.order.push(component_type.id());
        debug!(target: "entity", "{}: added {}", self, component_type);

        erased.borrow_mut().did_add_to_entity(self);

        self.notify(MembershipChange::Added {
            entity: self.id,
            component_type,
            component: Rc::downgrade(&erased),
        });

        typed
    }

    /// Removes the component of type `T`, returning it. No-op if absent.
    pub fn remove_component<T: Component>(&mut self) -> Option<Rc<RefCell<T>>> {
        let component_type = ComponentType::of::<T>();
        let typed = self.slots.get(&component_type.id())?.typed.clone();
        self.remove_component_of_type(component_type);
        typed.downcast::<RefCell<T>>().ok()
    }

    /// Type-erased removal. Returns `false` if no such component exists.
    pub fn remove_component_of_type(&mut self, component_type: ComponentType) -> bool {
        let Some(erased) = self.slots.get(&component_type.id()).map(|s| s.erased.clone()) else {
            return false;
        };

        match erased.try_borrow_mut() {
            Ok(mut component) => component.will_remove_from_entity(self),
            Err(_) => warn!(
                target: "entity",
                "{}: {} is borrowed, removing without will_remove notification",
                self,
                component_type
            ),
        }

        self.slots.remove(&component_type.id());
        self.order.retain(|id| *id != component_type.id());
        debug!(target: "entity", "{}: removed {}", self, component_type);

        self.notify(MembershipChange::Removed {
            entity: self.id,
            component_type,
        });
        true
    }

    /// Removes every component, newest first.
    pub fn remove_all_components(&mut self) {
        while let Some(&id) = self.order.last() {
            let Some(component_type) = self.slots.get(&id).map(|s| s.component_type) else {
                self.order.pop();
                continue;
            };
            self.remove_component_of_type(component_type);
        }
    }

    //--- Lookup -----------------------------------------------------------

    /// The component of type `T` stored on this entity.
    pub fn component<T: Component>(&self) -> Option<Rc<RefCell<T>>> {
        let slot = self.slots.get(&TypeId::of::<T>())?;
        slot.typed.clone().downcast::<RefCell<T>>().ok()
    }

    /// Co-component lookup: own components first, then relays.
    pub fn co_component<T: Component>(&self) -> Option<Rc<RefCell<T>>> {
        self.component::<T>().or_else(|| self.relayed::<T>())
    }

    /// Returns `true` if a component of `component_type` is stored locally.
    pub fn has_component_type(&self, component_type: ComponentType) -> bool {
        self.slots.contains_key(&component_type.id())
    }

    /// Returns `true` if `component_type` is reachable locally or through
    /// a live relay.
    pub fn provides(&self, component_type: ComponentType) -> bool {
        self.has_component_type(component_type)
            || self
                .relays
                .get(&component_type.id())
                .is_some_and(|r| r.target.strong_count() > 0)
    }

    /// Which of `required` this entity cannot currently provide.
    pub fn missing_components(&self, required: &[ComponentType]) -> Vec<ComponentType> {
        required.iter().copied().filter(|t| !self.provides(*t)).collect()
    }

    /// Component types in insertion order.
    pub fn component_types(&self) -> Vec<ComponentType> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(id).map(|s| s.component_type))
            .collect()
    }

    pub fn component_count(&self) -> usize {
        self.slots.len()
    }

    /// Type-erased handle to a stored component.
    pub fn component_handle(&self, component_type: ComponentType) -> Option<Rc<RefCell<dyn Component>>> {
        self.slots.get(&component_type.id()).map(|s| s.erased.clone())
    }

    /// Type-erased handles in insertion order.
    pub(crate) fn component_handles(&self) -> Vec<(ComponentType, Rc<RefCell<dyn Component>>)> {
        self.order
            .iter()
            .filter_map(|id| self.slots.get(id))
            .map(|s| (s.component_type, s.erased.clone()))
            .collect()
    }

    //--- Relays -----------------------------------------------------------

    /// Presents another entity's component of type `T` on this entity.
    ///
    /// Replaces any relay for the same type. Local components of type `T`
    /// still take precedence in [`co_component`](Self::co_component).
    pub fn add_relay<T: Component>(&mut self, relay: RelayComponent<T>) {
        let target_type = ComponentType::of::<T>();
        let target: Weak<dyn Any> = relay.into_weak();
        if self.relays.insert(target_type.id(), RelaySlot { target_type, target }).is_some() {
            debug!(target: "entity", "{}: replaced relay for {}", self, target_type);
        }
    }

    /// Removes the relay for `T`. The relayed component is unaffected.
    pub fn remove_relay<T: Component>(&mut self) -> bool {
        self.relays.remove(&TypeId::of::<T>()).is_some()
    }

    /// Types reachable through relays (live or not).
    pub fn relay_types(&self) -> Vec<ComponentType> {
        self.relays.values().map(|r| r.target_type).collect()
    }

    fn relayed<T: Component>(&self) -> Option<Rc<RefCell<T>>> {
        let target = self.relays.get(&TypeId::of::<T>())?.target.upgrade()?;
        target.downcast::<RefCell<T>>().ok()
    }

    //--- Scene Membership -------------------------------------------------

    pub(crate) fn attach_inbox(&mut self, inbox: &Rc<SystemInbox>) {
        let already = self
            .inboxes
            .iter()
            .any(|i| i.upgrade().is_some_and(|i| Rc::ptr_eq(&i, inbox)));
        if !already {
            self.inboxes.push(Rc::downgrade(inbox));
        }
    }

    pub(crate) fn detach_inbox(&mut self, inbox: &Rc<SystemInbox>) {
        self.inboxes
            .retain(|i| i.upgrade().is_some_and(|i| !Rc::ptr_eq(&i, inbox)));
    }

    fn notify(&mut self, change: MembershipChange) {
        self.inboxes.retain(|i| i.strong_count() > 0);
        for inbox in self.inboxes.iter().filter_map(Weak::upgrade) {
            inbox.push(change.clone());
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}{}", name, self.id),
            None => write!(f, "entity{}", self.id),
        }
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("components", &self.component_types())
            .field("relays", &self.relay_types())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::node::testing::RecordingNode;

    //--- Test Components --------------------------------------------------

    #[derive(Debug, PartialEq)]
    struct Position(i32);
    impl Component for Position {}

    struct Velocity;
    impl Component for Velocity {
        fn required_components(&self) -> Vec<ComponentType> {
            vec![ComponentType::of::<Position>()]
        }
    }

    #[derive(Default)]
    struct Lifecycle {
        added: u32,
        removed: u32,
        saw_node: bool,
        saw_self: bool,
    }

    impl Component for Lifecycle {
        fn did_add_to_entity(&mut self, entity: &Entity) {
            self.added += 1;
            self.saw_node = entity.node().is_some();
            self.saw_self = entity.has_component_type(ComponentType::of::<Lifecycle>());
        }

        fn will_remove_from_entity(&mut self, _entity: &Entity) {
            self.removed += 1;
        }
    }

    //=====================================================================
    // Uniqueness & Lookup
    //=====================================================================

    #[test]
    fn second_component_of_same_type_replaces_first() {
        let mut entity = Entity::new();
        let first = entity.add_component(Position(1));
        let second = entity.add_component(Position(2));

        let found = entity.component::<Position>().expect("position present");
        assert!(Rc::ptr_eq(&found, &second));
        assert!(!Rc::ptr_eq(&found, &first));
        assert_eq!(*found.borrow(), Position(2));
        assert_eq!(entity.component_count(), 1);
    }

    #[test]
    fn replaced_component_gets_will_remove() {
        let mut entity = Entity::new();
        let first = entity.add_component(Lifecycle::default());
        let second = entity.add_component(Lifecycle::default());

        assert_eq!(first.borrow().removed, 1);
        assert_eq!(second.borrow().removed, 0);
        assert_eq!(second.borrow().added, 1);
    }

    #[test]
    fn lookup_of_absent_type_is_none() {
        let entity = Entity::named("empty");
        assert!(entity.component::<Position>().is_none());
        assert!(entity.co_component::<Position>().is_none());
    }

    #[test]
    fn component_types_keep_insertion_order() {
        let mut entity = Entity::new();
        entity.add_component(Lifecycle::default());
        entity.add_component(Position(0));
        entity.add_component(Velocity);

        let names: Vec<_> = entity.component_types().iter().map(|t| t.short_name()).collect();
        assert_eq!(names, vec!["Lifecycle", "Position", "Velocity"]);
    }

    //=====================================================================
    // Lifecycle Hooks
    //=====================================================================

    #[test]
    fn did_add_sees_node_and_stored_component() {
        let node: NodeHandle = Rc::new(RecordingNode::default());
        let mut entity = Entity::named("hero").with_node(&node);

        let lifecycle = entity.add_component(Lifecycle::default());
        assert_eq!(lifecycle.borrow().added, 1);
        assert!(lifecycle.borrow().saw_node);
        assert!(lifecycle.borrow().saw_self);
    }

    #[test]
    fn node_link_is_weak() {
        let node: NodeHandle = Rc::new(RecordingNode::default());
        let entity = Entity::new().with_node(&node);
        assert!(entity.node().is_some());

        drop(node);
        assert!(entity.node().is_none());
    }

    #[test]
    fn remove_calls_will_remove_and_returns_component() {
        let mut entity = Entity::new();
        entity.add_component(Lifecycle::default());

        let removed = entity.remove_component::<Lifecycle>().expect("was present");
        assert_eq!(removed.borrow().removed, 1);
        assert!(entity.component::<Lifecycle>().is_none());
    }

    #[test]
    fn removing_absent_component_is_noop() {
        let mut entity = Entity::new();
        assert!(entity.remove_component::<Position>().is_none());
        assert!(!entity.remove_component_of_type(ComponentType::of::<Position>()));
    }

    #[test]
    fn remove_all_components_notifies_each() {
        let mut entity = Entity::new();
        let lifecycle = entity.add_component(Lifecycle::default());
        entity.add_component(Position(3));

        entity.remove_all_components();
        assert_eq!(entity.component_count(), 0);
        assert_eq!(lifecycle.borrow().removed, 1);
    }

    //=====================================================================
    // Required Components
    //=====================================================================

    #[test]
    fn missing_required_component_still_adds() {
        let mut entity = Entity::new();
        entity.add_component(Velocity);
        assert!(entity.component::<Velocity>().is_some());
        assert_eq!(
            entity.missing_components(&[ComponentType::of::<Position>()]),
            vec![ComponentType::of::<Position>()]
        );
    }

    #[test]
    fn required_component_added_later_is_found() {
        let mut entity = Entity::new();
        entity.add_component(Velocity);
        entity.add_component(Position(0));
        assert!(entity
            .missing_components(&[ComponentType::of::<Position>()])
            .is_empty());
    }

    //=====================================================================
    // Ownership
    //=====================================================================

    #[test]
    fn dropping_entity_releases_components() {
        let mut entity = Entity::new();
        let position = entity.add_component(Position(5));
        let weak = Rc::downgrade(&position);
        drop(position);

        assert!(weak.upgrade().is_some());
        drop(entity);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn entity_ids_are_unique() {
        let a = Entity::new();
        let b = Entity::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn display_uses_name_and_id() {
        let entity = Entity::named("player");
        assert!(entity.to_string().starts_with("player#"));
    }
}
