//=========================================================================
// Game Coordinator
//=========================================================================
//
// Drives the state machine and keeps the loaded scene and UI overlay in
// step with the current state.
//
// enter(target):
//   StateMachine::enter (validate → will_exit → swap → did_enter)
//     ├─ scene key changed?  unload old → load new (global entity + setup)
//     ├─ present UI overlay of the target
//     ├─ controller.did_enter_state() on the live scene
//     └─ presenter.state_did_change()
//
// Per frame:
//   scene.update() → apply StateRequest messages posted by components
//
// Pause triggers are recorded here as well as on the live scene, so every
// newly loaded scene starts with the same four flags.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::Presenter;
use crate::core::entity::EntityRef;
use crate::core::error::StateError;
use crate::core::scene::{PauseSource, PauseState, Scene, SceneController, SceneKey};
use crate::core::state::{StateKey, StateMachine, StateRequest, Transition};

//=== ActiveScene =========================================================

struct ActiveScene<C: SceneKey> {
    key: C,
    scene: Scene,
}

//=== GameCoordinator =====================================================

/// Owns the game states, the live scene and the persistent global entity.
///
/// Build one with [`CoordinatorBuilder`](super::CoordinatorBuilder), then
/// call [`start`](Self::start) once and [`update`](Self::update) every
/// host frame.
pub struct GameCoordinator<S: StateKey, C: SceneKey> {
    machine: StateMachine<S, C>,
    controllers: HashMap<C, Box<dyn SceneController<S>>>,
    presenter: Box<dyn Presenter<S, C>>,
    global: EntityRef,
    initial: S,
    active: Option<ActiveScene<C>>,
    pause: PauseState,
    scene_loads: u64,
}

impl<S: StateKey, C: SceneKey> GameCoordinator<S, C> {
    pub(super) fn from_parts(
        machine: StateMachine<S, C>,
        controllers: HashMap<C, Box<dyn SceneController<S>>>,
        presenter: Box<dyn Presenter<S, C>>,
        global: EntityRef,
        initial: S,
    ) -> Self {
        Self {
            machine,
            controllers,
            presenter,
            global,
            initial,
            active: None,
            pause: PauseState::new(),
            scene_loads: 0,
        }
    }

    //--- State Transitions ------------------------------------------------

    /// Enters the initial state and loads its scene.
    pub fn start(&mut self) -> Result<Transition<S>, StateError<S>> {
        let transition = self.machine.start(self.initial, &self.global)?;
        info!(target: "coordinator", "started in {:?}", transition.to);
        self.apply_transition(transition);
        Ok(transition)
    }

    /// Enters `target` if the current state allows it.
    ///
    /// A rejected request changes nothing: state, scene and overlay stay
    /// as they were, and the error says why.
    pub fn enter(&mut self, target: S) -> Result<Transition<S>, StateError<S>> {
        let transition = self.machine.enter(target, &self.global)?;
        self.apply_transition(transition);
        Ok(transition)
    }

    pub fn can_enter(&self, target: S) -> bool {
        self.machine.can_enter(target)
    }

    pub fn current_state(&self) -> Option<S> {
        self.machine.current()
    }

    pub fn is_started(&self) -> bool {
        self.machine.current().is_some()
    }

    pub fn state_machine(&self) -> &StateMachine<S, C> {
        &self.machine
    }

    //--- Frame & Turn Driving ---------------------------------------------

    /// Runs one frame of the live scene, then applies state requests
    /// posted during it. Returns `false` if nothing was dispatched.
    pub fn update(&mut self, delta_time: f64) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let ran = active.scene.update(delta_time);
        self.apply_state_requests();
        ran
    }

    /// Like [`update`](Self::update) with a host timestamp in seconds.
    pub fn update_at(&mut self, current_time: f64) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let ran = active.scene.update_at(current_time);
        self.apply_state_requests();
        ran
    }

    /// Runs one turn cycle on the live scene, then applies state requests.
    pub fn run_turn_cycle(&mut self, turns: u64) -> usize {
        let Some(active) = self.active.as_mut() else {
            return 0;
        };
        let visited = active.scene.run_turn_cycle(turns);
        self.apply_state_requests();
        visited
    }

    //--- Pause Triggers ---------------------------------------------------

    /// The host app is going to the background.
    pub fn app_will_resign_active(&mut self) {
        self.set_scene_paused(PauseSource::System, true);
    }

    /// The host app is back in the foreground.
    pub fn app_did_become_active(&mut self) {
        self.set_scene_paused(PauseSource::System, false);
    }

    /// In-game pause toggled by the player.
    pub fn set_paused_by_player(&mut self, paused: bool) {
        self.set_scene_paused(PauseSource::Player, paused);
    }

    /// A modal overlay now covers the scene.
    pub fn present_subscene(&mut self) {
        self.set_scene_paused(PauseSource::Subscene, true);
    }

    pub fn dismiss_subscene(&mut self) {
        self.set_scene_paused(PauseSource::Subscene, false);
    }

    /// Explicit pause through the scene API.
    pub fn set_paused(&mut self, paused: bool) {
        self.set_scene_paused(PauseSource::Manual, paused);
    }

    //--- Accessors --------------------------------------------------------

    /// Entity shared by every state; its components run in every scene.
    pub fn global_entity(&self) -> &EntityRef {
        &self.global
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.active.as_ref().map(|a| &a.scene)
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.active.as_mut().map(|a| &mut a.scene)
    }

    pub fn scene_key(&self) -> Option<C> {
        self.active.as_ref().map(|a| a.key)
    }

    /// Pause flags raised through the coordinator's triggers.
    pub fn pause_state(&self) -> &PauseState {
        &self.pause
    }

    /// Number of scene loads since construction.
    pub fn scene_load_count(&self) -> u64 {
        self.scene_loads
    }

    //--- Internal Helpers -------------------------------------------------

    fn apply_transition(&mut self, transition: Transition<S>) {
        let Some((scene_key, ui)) = self
            .machine
            .state(transition.to)
            .map(|state| (state.scene(), state.ui()))
        else {
            return;
        };

        if self.scene_key() != Some(scene_key) {
            self.load_scene(scene_key);
        } else {
            debug!(target: "coordinator", "{:?} keeps scene {:?}", transition.to, scene_key);
        }

        self.presenter.present_ui(ui, transition.to);

        if let Some(active) = self.active.as_mut() {
            if let Some(controller) = self.controllers.get_mut(&active.key) {
                controller.did_enter_state(transition.to, transition.from, &mut active.scene);
            }
        }

        self.presenter.state_did_change(transition);
    }

    fn load_scene(&mut self, key: C) {
        if let Some(mut old) = self.active.take() {
            if let Some(controller) = self.controllers.get_mut(&old.key) {
                controller.will_unload(&mut old.scene);
            }
            debug!(target: "coordinator", "unloaded scene {:?}", old.key);
        }

        let mut scene = Scene::new(format!("{key:?}"));
        scene.set_global_entity(self.global.clone());
        for source in self.pause.active_sources() {
            scene.set_paused(source, true);
        }

        match self.controllers.get_mut(&key) {
            Some(controller) => controller.setup(&mut scene),
            None => warn!(target: "coordinator", "scene {:?} has no controller; loaded empty", key),
        }

        self.presenter.present_scene(key, &scene);
        self.active = Some(ActiveScene { key, scene });
        self.scene_loads += 1;
        debug!(target: "coordinator", "loaded scene {:?}", key);
    }

    fn apply_state_requests(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        let requests = active.scene.messages_mut().drain::<StateRequest<S>>();

        for StateRequest(target) in requests {
            if let Err(err) = self.enter(target) {
                warn!(target: "coordinator", "dropped state request: {}", err);
            }
        }
    }

    fn set_scene_paused(&mut self, source: PauseSource, paused: bool) {
        self.pause.set(source, paused);
        if let Some(active) = self.active.as_mut() {
            active.scene.set_paused(source, paused);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
