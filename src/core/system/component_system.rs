//=========================================================================
// Component System
//=========================================================================
//
// Updates every component of one declared type, across all entities of
// a scene, in the order the components joined the system.
//
// Members are weak: the owning entity decides the component's lifetime.
// Dead members are skipped and pruned after the pass.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::FrameContext;
use crate::core::entity::{Component, ComponentType, Entity, EntityId, EntityRef};
use crate::core::message_bus::MessageBus;

//=== SystemMember ========================================================

struct SystemMember {
    entity_id: EntityId,
    entity: Weak<RefCell<Entity>>,
    component: Weak<RefCell<dyn Component>>,
}

impl SystemMember {
    fn is_alive(&self) -> bool {
        self.component.strong_count() > 0 && self.entity.strong_count() > 0
    }
}

//=== ComponentSystem =====================================================

/// Ordered collection of all components of one type in a scene.
pub struct ComponentSystem {
    component_type: ComponentType,
    members: Vec<SystemMember>,
}

impl ComponentSystem {
    pub fn new(component_type: ComponentType) -> Self {
        Self {
            component_type,
            members: Vec::new(),
        }
    }

    /// System for components of type `T`.
    pub fn of<T: Component>() -> Self {
        Self::new(ComponentType::of::<T>())
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    //--- Queries ----------------------------------------------------------

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.members.iter().filter(|m| m.is_alive()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Owning entities of the live members, in update order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.members
            .iter()
            .filter(|m| m.is_alive())
            .map(|m| m.entity_id)
            .collect()
    }

    /// Live members, in update order.
    pub fn components(&self) -> Vec<Rc<RefCell<dyn Component>>> {
        self.members
            .iter()
            .filter(|m| m.entity.strong_count() > 0)
            .filter_map(|m| m.component.upgrade())
            .collect()
    }

    //--- Membership -------------------------------------------------------

    /// Appends `component` owned by `entity`. An entity has at most one
    /// member per system, so an older member of the same entity is dropped.
    pub(crate) fn insert(
        &mut self,
        entity_id: EntityId,
        entity: &EntityRef,
        component: Weak<RefCell<dyn Component>>,
    ) {
        if component.strong_count() == 0 {
            return;
        }

        self.members.retain(|m| m.entity_id != entity_id);
        self.members.push(SystemMember {
            entity_id,
            entity: Rc::downgrade(entity),
            component,
        });
        trace!(target: "system", "{}: added member from entity {}", self.component_type, entity_id);
    }

    pub(crate) fn remove_entity(&mut self, entity_id: EntityId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.entity_id != entity_id);
        before != self.members.len()
    }

    //--- Update -----------------------------------------------------------

    /// Updates every live updatable member in insertion order.
    ///
    /// Returns the number of components updated.
    pub(crate) fn update(&mut self, delta_time: f64, frame: u64, messages: &mut MessageBus) -> usize {
        let mut updated = 0;
        let mut saw_dead = false;

        for member in &self.members {
            let (Some(component), Some(entity)) = (member.component.upgrade(), member.entity.upgrade())
            else {
                saw_dead = true;
                continue;
            };

            let Ok(mut component) = component.try_borrow_mut() else {
                warn!(
                    target: "system",
                    "{}: component of entity {} is already borrowed, skipping this frame",
                    self.component_type,
                    member.entity_id
                );
                continue;
            };

            if let Some(updatable) = component.as_updatable() {
                let mut context = FrameContext::new(delta_time, frame, &entity, messages);
                updatable.update(&mut context);
                updated += 1;
            }
        }

        if saw_dead {
            self.members.retain(SystemMember::is_alive);
        }

        updated
    }
}

impl std::fmt::Debug for ComponentSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentSystem")
            .field("component_type", &self.component_type.short_name())
            .field("members", &self.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
