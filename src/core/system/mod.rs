//=========================================================================
// Component Systems
//=========================================================================
//
// Per-frame dispatch of component updates.
//
// Architecture:
//   Scene
//     ├─ systems: Vec<ComponentSystem>   (registration order = update order)
//     │    └─ members: Weak components   (insertion order)
//     └─ inbox:   SystemInbox            (membership changes from entities)
//
// Each frame: systems[0] members, then systems[1] members, ... Nothing
// sorts the list; dependencies must be registered before dependents.
//
//=========================================================================

//=== Module Declarations =================================================

mod component_system;
mod frame;
mod inbox;

//=== Public API ==========================================================

pub use component_system::ComponentSystem;
pub use frame::FrameContext;

pub(crate) use inbox::{MembershipChange, SystemInbox};
