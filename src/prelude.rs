//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_kit::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Entities and components
pub use crate::core::entity::{
    Component, ComponentType, Entity, EntityId, EntityRef, NodeComponent, RelayComponent,
    Updatable,
};

// Systems and turns
pub use crate::core::system::{ComponentSystem, FrameContext};
pub use crate::core::turn::{TurnBased, TurnGuards, TurnPhase};

// Scenes
pub use crate::core::scene::{PauseSource, Scene, SceneController, SceneKey};

// Game states
pub use crate::core::state::{GameState, StateDefinition, StateKey, StateRequest, Transition, UiId};

// Coordination
pub use crate::core::coordinator::{CoordinatorBuilder, GameCoordinator, NullPresenter, Presenter};

// Input
pub use crate::core::input::{
    KeyCode, KeyEvent, KeyboardEventComponent, Modifiers, MotionEventComponent, MotionSample,
    MouseButton, PointerEvent, PointerEventComponent, PointerPhase, PointerSource,
};

// Host scene graph
pub use crate::core::node::{NodeHandle, Point, SceneNode};

// Messaging, observation and errors
pub use crate::core::error::{ConfigError, StateError};
pub use crate::core::message_bus::MessageBus;
pub use crate::core::observable::Observable;
