//=========================================================================
// Entities & Components
//=========================================================================
//
// Architecture:
//   EntityRef = Rc<RefCell<Entity>>
//     └─ Entity
//          ├─ components: one Rc<RefCell<T>> per concrete type (owned)
//          ├─ relays:     Weak links to other entities' components
//          └─ node:       Weak link to the host scene node
//
// Lookup:
//   component::<T>()     local only
//   co_component::<T>()  local, then relay
//
//=========================================================================

//=== Module Declarations =================================================

mod component;
#[allow(clippy::module_inception)]
mod entity;
mod node_component;
mod relay;

//=== Public API ==========================================================

pub use component::{Component, ComponentType, Updatable};
pub use entity::{Entity, EntityId, EntityRef};
pub use node_component::NodeComponent;
pub use relay::RelayComponent;
