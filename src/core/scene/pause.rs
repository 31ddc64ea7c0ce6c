//=========================================================================
// Pause Gate
//=========================================================================
//
// Four independent reasons a scene may stop updating. Each is toggled
// only by its own trigger; the scene updates iff none is set.
//
//   Manual    explicit scene API
//   System    app lifecycle (backgrounding, focus loss)
//   Player    in-game pause action
//   Subscene  a modal overlay is presented over the scene
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::observable::Observable;

//=== PauseSource =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PauseSource {
    Manual,
    System,
    Player,
    Subscene,
}

impl PauseSource {
    pub const ALL: [PauseSource; 4] = [
        PauseSource::Manual,
        PauseSource::System,
        PauseSource::Player,
        PauseSource::Subscene,
    ];
}

//=== PauseState ==========================================================

/// The four pause flags of a scene. Changes are logged under the
/// `observable` target.
#[derive(Debug, Clone)]
pub struct PauseState {
    manual: Observable<bool>,
    system: Observable<bool>,
    player: Observable<bool>,
    subscene: Observable<bool>,
}

impl PauseState {
    pub fn new() -> Self {
        Self {
            manual: Observable::logged("paused_manually", false),
            system: Observable::logged("paused_by_system", false),
            player: Observable::logged("paused_by_player", false),
            subscene: Observable::logged("paused_by_subscene", false),
        }
    }

    /// Sets one flag. Returns `true` if it changed.
    pub fn set(&mut self, source: PauseSource, paused: bool) -> bool {
        self.flag_mut(source).set(paused)
    }

    pub fn is_paused_by(&self, source: PauseSource) -> bool {
        *self.flag(source).get()
    }

    /// `true` iff no pause source is set.
    pub fn should_update(&self) -> bool {
        PauseSource::ALL.iter().all(|s| !self.is_paused_by(*s))
    }

    pub fn is_paused(&self) -> bool {
        !self.should_update()
    }

    /// Sources currently set, in declaration order.
    pub fn active_sources(&self) -> Vec<PauseSource> {
        PauseSource::ALL
            .into_iter()
            .filter(|s| self.is_paused_by(*s))
            .collect()
    }

    fn flag(&self, source: PauseSource) -> &Observable<bool> {
        match source {
            PauseSource::Manual => &self.manual,
            PauseSource::System => &self.system,
            PauseSource::Player => &self.player,
            PauseSource::Subscene => &self.subscene,
        }
    }

    fn flag_mut(&mut self, source: PauseSource) -> &mut Observable<bool> {
        match source {
            PauseSource::Manual => &mut self.manual,
            PauseSource::System => &mut self.system,
            PauseSource::Player => &mut self.player,
            PauseSource::Subscene => &mut self.subscene,
        }
    }
}

impl Default for PauseState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
