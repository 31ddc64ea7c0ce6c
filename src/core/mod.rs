//=========================================================================
// Core Framework
//=========================================================================
//
// Engine-independent part of the kit.
//
// Architecture:
// ```text
//   GameCoordinator ── StateMachine ── GameState (scene key, UI, next states)
//        │
//        └─ Scene ── ComponentSystem (one per component type, ordered)
//             │            └─ updates components of every member entity
//             └─ Entity ── Component (+ relays to components elsewhere)
// ```
//
// Everything runs on the host's main thread; shared ownership is
// `Rc<RefCell<_>>` with `Weak` back-references.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod coordinator;
pub mod entity;
pub mod error;
pub mod input;
pub mod message_bus;
pub mod node;
pub mod observable;
pub mod scene;
pub mod state;
pub mod system;
pub mod turn;
