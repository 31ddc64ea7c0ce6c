//=========================================================================
// Scene System
//=========================================================================
//
// Loaded scenes and the game code that builds them.
//
// Architecture:
//   GameCoordinator
//     ├─ controllers: HashMap<C, Box<dyn SceneController<S>>>
//     └─ active: (C, Scene)
//          ├─ entities (+ the global entity)
//          ├─ systems in update order
//          └─ pause gate + frame clock
//
// Flow:
//   load:   Scene::new() → add global entity → controller.setup()
//   state:  controller.did_enter_state()   (same scene, no reload)
//   unload: controller.will_unload() → drop Scene
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Internal Dependencies ===============================================

use crate::core::state::StateKey;

//=== Module Declarations =================================================

mod clock;
mod pause;
#[allow(clippy::module_inception)]
mod scene;

//=== Public API ==========================================================

pub use clock::FrameClock;
pub use pause::{PauseSource, PauseState};
pub use scene::Scene;

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Game states refer to their scene by key; several states sharing a key
/// share one loaded scene. Typically implemented by game-specific enums.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== Scene Controller Trait ==============================================

/// Game code that builds and drives one kind of scene.
///
/// # Example
///
/// ```rust
/// # use aetheric_kit::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Phase { Play, Paused }
/// # impl StateKey for Phase {}
/// # #[derive(Default)]
/// # struct Mover;
/// # impl Component for Mover {}
/// struct Level;
///
/// impl SceneController<Phase> for Level {
///     fn setup(&mut self, scene: &mut Scene) {
///         scene.register_system::<Mover>();
///
///         let hero = Entity::named("hero").into_ref();
///         hero.borrow_mut().add_component(Mover);
///         scene.add_entity(hero);
///     }
///
///     fn did_enter_state(&mut self, state: Phase, _previous: Option<Phase>, scene: &mut Scene) {
///         scene.set_paused(PauseSource::Player, state == Phase::Paused);
///     }
/// }
/// ```
pub trait SceneController<S: StateKey> {
    /// Builds systems and entities on a freshly loaded scene.
    ///
    /// Called every time the scene is loaded; the global entity is
    /// already in the scene.
    fn setup(&mut self, scene: &mut Scene);

    /// Called on the live scene after every state change, including the
    /// change that loaded it.
    fn did_enter_state(&mut self, _state: S, _previous: Option<S>, _scene: &mut Scene) {}

    /// Called before the scene is dropped in favour of another one.
    fn will_unload(&mut self, _scene: &mut Scene) {}
}
