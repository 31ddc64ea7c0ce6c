//=========================================================================
// Scene Node Interface
//=========================================================================
//
// The kit's view of the host scene graph (sprites, shape nodes, cameras).
//
// The host owns the node tree and renders it; components only attach
// children, read geometry and fire off actions. Nodes are shared through
// `Rc` and mutated through `&self`, matching how retained scene graphs
// hand out node references.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::{Rc, Weak};

//=== Geometry ============================================================

/// Position in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Width and height in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

//=== NodeAction ==========================================================

/// Host-native animation or effect, fire-and-forget.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeAction {
    FadeIn { duration: f32 },
    FadeOut { duration: f32 },
    MoveTo { position: Point, duration: f32 },
    MoveBy { dx: f32, dy: f32, duration: f32 },
    /// Host-defined action looked up by name.
    Named(String),
}

//=== SceneNode ===========================================================

/// A node in the host's scene graph.
pub trait SceneNode {
    /// Rendered size of the node.
    fn size(&self) -> Size;

    /// Position relative to the parent node.
    fn position(&self) -> Point;

    fn set_position(&self, position: Point);

    /// Attaches `child` below this node.
    fn add_child(&self, child: NodeHandle);

    /// Detaches this node from its parent; no-op if it has none.
    fn remove_from_parent(&self);

    /// Schedules a host action. The kit never observes the outcome.
    fn run_action(&self, action: NodeAction);
}

/// Shared reference to a host node.
pub type NodeHandle = Rc<dyn SceneNode>;

/// Non-owning reference to a host node.
pub type WeakNodeHandle = Weak<dyn SceneNode>;

//=========================================================================
// Test Doubles
//=========================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Records every call made by the kit.
    #[derive(Default)]
    pub(crate) struct RecordingNode {
        pub(crate) position: RefCell<Point>,
        pub(crate) children: RefCell<Vec<NodeHandle>>,
        pub(crate) actions: RefCell<Vec<NodeAction>>,
        pub(crate) removed_from_parent: RefCell<u32>,
    }

    impl SceneNode for RecordingNode {
        fn size(&self) -> Size {
            Size::new(32.0, 32.0)
        }

        fn position(&self) -> Point {
            *self.position.borrow()
        }

        fn set_position(&self, position: Point) {
            *self.position.borrow_mut() = position;
        }

        fn add_child(&self, child: NodeHandle) {
            self.children.borrow_mut().push(child);
        }

        fn remove_from_parent(&self) {
            *self.removed_from_parent.borrow_mut() += 1;
        }

        fn run_action(&self, action: NodeAction) {
            self.actions.borrow_mut().push(action);
        }
    }
}
