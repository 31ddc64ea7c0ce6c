//=========================================================================
// Game States
//=========================================================================
//
// Architecture:
//   StateMachine<S, C>
//     ├─ states:  HashMap<S, Box<dyn GameState<S, C>>>
//     └─ current: Observable<Option<S>>
//
// Each state names its scene (C) and optional UI overlay; the
// coordinator turns state changes into scene loads and UI swaps.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Module Declarations =================================================

mod game_state;
mod state_machine;

//=== Public API ==========================================================

pub use game_state::{GameState, StateDefinition, StateRequest, UiId};
pub use state_machine::{StateMachine, Transition};

//=== State Key Trait =====================================================

/// Marker trait for game state identifiers, typically a game-specific enum.
pub trait StateKey: Clone + Copy + Eq + Hash + Debug + 'static {}
