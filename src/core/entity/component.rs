//=========================================================================
// Component Capabilities
//=========================================================================
//
// A component is a unit of behavior/state attached to exactly one entity
// per concrete type. What it can do is opted into through capabilities:
//
//   Component   lifecycle hooks + dependency declaration (always)
//   Updatable   per-frame update, dispatched by component systems
//   TurnBased   begin/update/end turn phases, dispatched by turn cycles
//
// Capabilities are discovered through `as_updatable` / `as_turn_based`,
// which a component overrides with `Some(self)` when it implements them.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::fmt;

//=== Internal Dependencies ===============================================

use super::Entity;
use crate::core::system::FrameContext;
use crate::core::turn::TurnBased;

//=== ComponentType =======================================================

/// Runtime identity of a concrete component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentType {
    id: TypeId,
    name: &'static str,
}

impl ComponentType {
    /// Identity of `T`.
    pub fn of<T: Component>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path (generic arguments kept).
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

//=== Component Trait =====================================================

/// Behavior or state attached to an [`Entity`].
///
/// Entities own their components; a component never holds a strong
/// reference back to its entity. Everything a component needs about its
/// entity is handed to it: `&Entity` in the lifecycle hooks and the
/// entity reference on the [`FrameContext`] during updates.
///
/// # Example
///
/// ```
/// use aetheric_kit::prelude::*;
///
/// #[derive(Default)]
/// struct Health(i32);
///
/// impl Component for Health {}
///
/// #[derive(Default)]
/// struct Regeneration;
///
/// impl Component for Regeneration {
///     fn required_components(&self) -> Vec<ComponentType> {
///         vec![ComponentType::of::<Health>()]
///     }
///
///     fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
///         Some(self)
///     }
/// }
///
/// impl Updatable for Regeneration {
///     fn update(&mut self, frame: &mut FrameContext<'_>) {
///         // Absent co-component: skip the work this frame.
///         let Some(health) = frame.co_component::<Health>() else { return };
///         health.borrow_mut().0 += 1;
///     }
/// }
/// ```
pub trait Component: Any {
    /// Sibling component types this component works with.
    ///
    /// Checked when the component is added; a missing type only produces
    /// a warning because callers control the order in which components
    /// are added.
    fn required_components(&self) -> Vec<ComponentType> {
        Vec::new()
    }

    /// Called after the component has been stored in `entity`.
    fn did_add_to_entity(&mut self, _entity: &Entity) {}

    /// Called while the component is still stored in `entity`, just
    /// before it is removed or replaced.
    fn will_remove_from_entity(&mut self, _entity: &Entity) {}

    /// Per-frame capability. Return `Some(self)` to be updated by the
    /// component system registered for this type.
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// Turn-cycle capability. Return `Some(self)` to take part in turns.
    fn as_turn_based(&mut self) -> Option<&mut dyn TurnBased> {
        None
    }
}

//=== Updatable ===========================================================

/// Per-frame behavior.
pub trait Updatable {
    /// Advances the component by `frame.delta_time()` seconds.
    ///
    /// Must return before the frame deadline and must not assume a fixed
    /// frame rate.
    fn update(&mut self, frame: &mut FrameContext<'_>);
}

//=========================================================================
// Unit Tests
//=========================================================================
