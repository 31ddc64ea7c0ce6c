//=========================================================================
// Presenter
//=========================================================================
//
// Host-side view layer: shows loaded scenes and mounts the UI overlay of
// the current state. The kit only tells it what changed; animations and
// view lifecycles stay on the host side.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::scene::{Scene, SceneKey};
use crate::core::state::{StateKey, Transition, UiId};

//=== Presenter Trait =====================================================

/// Receives scene and UI changes from the coordinator.
pub trait Presenter<S: StateKey, C: SceneKey> {
    /// A new scene was loaded and set up; show it.
    fn present_scene(&mut self, _key: C, _scene: &Scene) {}

    /// Mount the overlay of `state` (`None` removes any overlay).
    fn present_ui(&mut self, _ui: Option<UiId>, _state: S) {}

    /// The current state changed.
    fn state_did_change(&mut self, _transition: Transition<S>) {}
}

//=== NullPresenter =======================================================

/// Presenter that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl<S: StateKey, C: SceneKey> Presenter<S, C> for NullPresenter {}
