//=========================================================================
// Node Component
//=========================================================================
//
// Gives an entity a visual representation: a host node that is attached
// below the entity's own node when the component is added and detached
// when it is removed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Component, Entity};
use crate::core::node::{NodeAction, NodeHandle, Point, Size};

//=== NodeComponent =======================================================

/// Owns a host node and keeps it parented to the entity's node.
pub struct NodeComponent {
    node: NodeHandle,
    attached: bool,
}

impl NodeComponent {
    pub fn new(node: NodeHandle) -> Self {
        Self { node, attached: false }
    }

    pub fn node(&self) -> &NodeHandle {
        &self.node
    }

    /// `true` while the node is parented to an entity node.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn size(&self) -> Size {
        self.node.size()
    }

    pub fn position(&self) -> Point {
        self.node.position()
    }

    pub fn set_position(&self, position: Point) {
        self.node.set_position(position);
    }

    pub fn run_action(&self, action: NodeAction) {
        self.node.run_action(action);
    }
}

impl Component for NodeComponent {
    fn did_add_to_entity(&mut self, entity: &Entity) {
        // An entity without a node leaves the component detached.
        let Some(parent) = entity.node() else {
            debug!(target: "entity", "{}: no node to attach to", entity);
            return;
        };
        parent.add_child(self.node.clone());
        self.attached = true;
    }

    fn will_remove_from_entity(&mut self, _entity: &Entity) {
        if self.attached {
            self.node.remove_from_parent();
            self.attached = false;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
