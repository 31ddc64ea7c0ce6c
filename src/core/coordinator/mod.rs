//=========================================================================
// Game Coordination
//=========================================================================
//
// Architecture:
//   GameCoordinator<S, C>
//     ├─ machine:     StateMachine<S, C>
//     ├─ controllers: one SceneController per scene key
//     ├─ presenter:   host view layer
//     ├─ global:      EntityRef shared across every state
//     └─ active:      the loaded Scene and its key
//
//=========================================================================

//=== Module Declarations =================================================

mod builder;
#[allow(clippy::module_inception)]
mod coordinator;
mod presenter;

//=== Public API ==========================================================

pub use builder::CoordinatorBuilder;
pub use coordinator::GameCoordinator;
pub use presenter::{NullPresenter, Presenter};
