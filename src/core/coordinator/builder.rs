//=========================================================================
// Coordinator Builder
//=========================================================================
//
// Fluent configuration of a GameCoordinator.
//
// ```text
//     CoordinatorBuilder ──build()──> GameCoordinator ──start()──> [Running]
//         │                                │
//         ├─ with_state()                  └─ update() per host frame
//         ├─ with_scene()
//         ├─ with_presenter()
//         └─ with_initial_state()
// ```
//
// build() validates the whole configuration up front so that a running
// coordinator never meets a dangling edge or a scene nobody can set up.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::info;

//=== Internal Dependencies ===============================================

use super::{GameCoordinator, NullPresenter, Presenter};
use crate::core::entity::Entity;
use crate::core::error::ConfigError;
use crate::core::scene::{SceneController, SceneKey};
use crate::core::state::{GameState, StateKey, StateMachine};

//=== CoordinatorBuilder ==================================================

/// Builder for a [`GameCoordinator`].
///
/// # Default Values
///
/// - **Presenter**: [`NullPresenter`]
/// - **Global entity name**: `"global"`
/// - **State logging**: off
///
/// # Examples
///
/// ```rust
/// use aetheric_kit::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum State { Title, Play }
/// impl StateKey for State {}
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Stage { Menu, Level }
/// impl SceneKey for Stage {}
///
/// struct Empty;
/// impl SceneController<State> for Empty {
///     fn setup(&mut self, _scene: &mut Scene) {}
/// }
///
/// let mut coordinator = CoordinatorBuilder::new()
///     .with_state(StateDefinition::new(State::Title, Stage::Menu).leads_to([State::Play]))
///     .with_state(StateDefinition::new(State::Play, Stage::Level))
///     .with_scene(Stage::Menu, Empty)
///     .with_scene(Stage::Level, Empty)
///     .with_initial_state(State::Title)
///     .build()
///     .expect("valid configuration");
///
/// coordinator.start().expect("initial state");
/// assert!(coordinator.enter(State::Play).is_ok());
/// assert!(coordinator.enter(State::Title).is_err());
/// ```
pub struct CoordinatorBuilder<S: StateKey, C: SceneKey> {
    states: Vec<Box<dyn GameState<S, C>>>,
    controllers: Vec<(C, Box<dyn SceneController<S>>)>,
    presenter: Option<Box<dyn Presenter<S, C>>>,
    initial: Option<S>,
    global_name: String,
    state_logging: bool,
}

impl<S: StateKey, C: SceneKey> CoordinatorBuilder<S, C> {
    /// Creates a builder with default settings and no states.
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            controllers: Vec::new(),
            presenter: None,
            initial: None,
            global_name: "global".to_string(),
            state_logging: false,
        }
    }

    /// Registers a game state.
    pub fn with_state(mut self, state: impl GameState<S, C> + 'static) -> Self {
        self.states.push(Box::new(state));
        self
    }

    /// Registers the controller that sets up scene `key` whenever it loads.
    pub fn with_scene(mut self, key: C, controller: impl SceneController<S> + 'static) -> Self {
        self.controllers.push((key, Box::new(controller)));
        self
    }

    /// Sets the host presenter notified of scene and UI changes.
    pub fn with_presenter(mut self, presenter: impl Presenter<S, C> + 'static) -> Self {
        self.presenter = Some(Box::new(presenter));
        self
    }

    /// State entered by [`GameCoordinator::start`]. Required.
    pub fn with_initial_state(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Name of the persistent entity shared across states.
    ///
    /// Default: `"global"`
    pub fn with_global_entity_name(mut self, name: impl Into<String>) -> Self {
        self.global_name = name.into();
        self
    }

    /// Logs every change of the current state (`observable` target).
    ///
    /// Default: off
    pub fn with_state_logging(mut self, enabled: bool) -> Self {
        self.state_logging = enabled;
        self
    }

    /// Validates the configuration and builds the coordinator.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingInitialState`] without `with_initial_state`
    /// - [`ConfigError::DuplicateState`] if a key is registered twice
    /// - [`ConfigError::DanglingTransition`] if a next state is unregistered
    /// - [`ConfigError::UnknownInitialState`] if the initial state is unregistered
    /// - [`ConfigError::DuplicateSceneController`] if a scene has two controllers
    /// - [`ConfigError::MissingSceneController`] if a state's scene has none
    pub fn build(self) -> Result<GameCoordinator<S, C>, ConfigError> {
        let initial = self.initial.ok_or(ConfigError::MissingInitialState)?;

        let mut machine = StateMachine::new();
        for state in self.states {
            machine.add_state(state)?;
        }
        machine.validate_graph()?;
        if !machine.contains(initial) {
            return Err(ConfigError::UnknownInitialState(format!("{initial:?}")));
        }

        let mut controllers: HashMap<C, Box<dyn SceneController<S>>> = HashMap::new();
        for (key, controller) in self.controllers {
            if controllers.insert(key, controller).is_some() {
                return Err(ConfigError::DuplicateSceneController(format!("{key:?}")));
            }
        }

        for key in machine.state_keys() {
            let Some(scene) = machine.state(*key).map(|s| s.scene()) else {
                continue;
            };
            if !controllers.contains_key(&scene) {
                return Err(ConfigError::MissingSceneController {
                    state: format!("{key:?}"),
                    scene: format!("{scene:?}"),
                });
            }
        }

        machine.set_state_logging(self.state_logging);

        info!(
            target: "coordinator",
            "built coordinator ({} states, {} scenes, initial {:?})",
            machine.state_keys().len(),
            controllers.len(),
            initial
        );

        let presenter = self.presenter.unwrap_or_else(|| Box::new(NullPresenter));
        let global = Entity::named(self.global_name).into_ref();

        Ok(GameCoordinator::from_parts(machine, controllers, presenter, global, initial))
    }
}

impl<S: StateKey, C: SceneKey> Default for CoordinatorBuilder<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
