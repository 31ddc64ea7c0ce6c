//=========================================================================
// System Inbox
//=========================================================================
//
// Queue of component additions/removals reported by entities that
// belong to a scene. Entities push into it whenever their component set
// changes (possibly mid-frame, from inside a component update); the
// scene applies the queue at frame boundaries.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Weak;

//=== Internal Dependencies ===============================================

use crate::core::entity::{Component, ComponentType, EntityId};

//=== MembershipChange ====================================================

#[derive(Clone)]
pub(crate) enum MembershipChange {
    Added {
        entity: EntityId,
        component_type: ComponentType,
        component: Weak<RefCell<dyn Component>>,
    },
    Removed {
        entity: EntityId,
        component_type: ComponentType,
    },
}

//=== SystemInbox =========================================================

#[derive(Default)]
pub(crate) struct SystemInbox {
    pending: RefCell<Vec<MembershipChange>>,
}

impl SystemInbox {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, change: MembershipChange) {
        self.pending.borrow_mut().push(change);
    }

    /// Takes every pending change, oldest first.
    pub(crate) fn take(&self) -> Vec<MembershipChange> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.borrow().len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use std::rc::Rc;

    struct Marker;
    impl Component for Marker {}

    #[test]
    fn attached_entity_reports_changes_in_order() {
        let inbox = Rc::new(SystemInbox::new());
        let mut entity = Entity::new();
        entity.attach_inbox(&inbox);

        entity.add_component(Marker);
        entity.remove_component::<Marker>();

        let changes = inbox.take();
        assert_eq!(changes.len(), 2);
        assert!(matches!(changes[0], MembershipChange::Added { .. }));
        assert!(matches!(changes[1], MembershipChange::Removed { .. }));
        assert_eq!(inbox.len(), 0);
    }

    #[test]
    fn detached_entity_is_silent() {
        let inbox = Rc::new(SystemInbox::new());
        let mut entity = Entity::new();
        entity.attach_inbox(&inbox);
        entity.detach_inbox(&inbox);

        entity.add_component(Marker);
        assert_eq!(inbox.len(), 0);
    }

    #[test]
    fn attaching_twice_reports_once() {
        let inbox = Rc::new(SystemInbox::new());
        let mut entity = Entity::new();
        entity.attach_inbox(&inbox);
        entity.attach_inbox(&inbox);

        entity.add_component(Marker);
        assert_eq!(inbox.len(), 1);
    }
}
