//=========================================================================
// Game State
//=========================================================================
//
// A node of the state graph: its scene, its optional UI overlay and the
// states it may lead to.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use super::StateKey;
use crate::core::entity::EntityRef;
use crate::core::scene::SceneKey;

//=== UiId ================================================================

/// Identifier of a UI overlay descriptor, resolved by the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UiId(pub &'static str);

impl UiId {
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for UiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

//=== GameState Trait =====================================================

/// One state of the game's state graph.
///
/// States live for the whole application; whether a state is current is
/// tracked by the state machine, not by the state.
pub trait GameState<S: StateKey, C: SceneKey> {
    fn key(&self) -> S;

    /// Scene shown while this state is current.
    fn scene(&self) -> C;

    /// UI overlay mounted while this state is current.
    fn ui(&self) -> Option<UiId> {
        None
    }

    /// States reachable from this one. Empty for terminal states.
    fn valid_next_states(&self) -> &[S];

    fn is_valid_next_state(&self, next: S) -> bool {
        self.valid_next_states().contains(&next)
    }

    /// Called after this state became current.
    fn did_enter(&mut self, _previous: Option<S>, _global: &EntityRef) {}

    /// Called while this state is still current, before `next` takes over.
    fn will_exit(&mut self, _next: S, _global: &EntityRef) {}
}

//=== StateDefinition =====================================================

/// Data-only [`GameState`] built fluently.
///
/// ```rust
/// # use aetheric_kit::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum State { Play, Paused, GameOver }
/// # impl StateKey for State {}
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Level { One }
/// # impl SceneKey for Level {}
/// let play = StateDefinition::new(State::Play, Level::One)
///     .with_ui(UiId("hud"))
///     .leads_to([State::Paused, State::GameOver]);
///
/// assert!(play.is_valid_next_state(State::Paused));
/// assert!(!play.is_valid_next_state(State::Play));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDefinition<S: StateKey, C: SceneKey> {
    key: S,
    scene: C,
    ui: Option<UiId>,
    next: Vec<S>,
}

impl<S: StateKey, C: SceneKey> StateDefinition<S, C> {
    pub fn new(key: S, scene: C) -> Self {
        Self { key, scene, ui: None, next: Vec::new() }
    }

    pub fn with_ui(mut self, ui: UiId) -> Self {
        self.ui = Some(ui);
        self
    }

    /// Adds `states` to the valid next states. Listing the state's own
    /// key declares a self-loop.
    pub fn leads_to(mut self, states: impl IntoIterator<Item = S>) -> Self {
        for state in states {
            if !self.next.contains(&state) {
                self.next.push(state);
            }
        }
        self
    }
}

impl<S: StateKey, C: SceneKey> GameState<S, C> for StateDefinition<S, C> {
    fn key(&self) -> S {
        self.key
    }

    fn scene(&self) -> C {
        self.scene
    }

    fn ui(&self) -> Option<UiId> {
        self.ui
    }

    fn valid_next_states(&self) -> &[S] {
        &self.next
    }
}

//=== StateRequest ========================================================

/// Message asking the coordinator to enter a state after the current
/// frame. Posted through `FrameContext::request_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRequest<S: StateKey>(pub S);
