//=========================================================================
// Turn-Based Sub-Cycle
//=========================================================================
//
// Discrete-time protocol layered on top of per-frame updates. A driver
// (game code) calls `run_turn_cycle` on turn boundaries; every turn-based
// component gets `begin_turn`, then every one gets `update_turn`, then
// every one gets `end_turn`.
//
// Each phase call receives a `FrameContext` for the component's entity,
// so turn code can read co-components, post messages and request state
// changes exactly like frame code. The context's delta time is zero.
//
// Frame updates keep running regardless of turns.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::entity::{Component, EntityRef};
use crate::core::message_bus::MessageBus;
use crate::core::system::FrameContext;

//=== TurnBased ===========================================================

/// Capability for components that take part in the turn cycle.
///
/// `turns` is the number of turns elapsed since the previous cycle
/// (normally 1). All methods default to no-ops.
pub trait TurnBased {
    fn begin_turn(&mut self, _turns: u64, _ctx: &mut FrameContext<'_>) {}
    fn update_turn(&mut self, _turns: u64, _ctx: &mut FrameContext<'_>) {}
    fn end_turn(&mut self, _turns: u64, _ctx: &mut FrameContext<'_>) {}
}

//=== TurnPhase ===========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    Begin,
    Update,
    End,
}

impl TurnPhase {
    /// Phases in execution order.
    pub const ALL: [TurnPhase; 3] = [TurnPhase::Begin, TurnPhase::Update, TurnPhase::End];
}

//=== TurnGuards ==========================================================

/// Self-policing "once per driver cycle" flags.
///
/// The driver never reads these; a component embeds a `TurnGuards`,
/// calls [`claim`](Self::claim) at the top of each phase method and
/// returns early when it yields `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnGuards {
    pub disallow_begin: bool,
    pub disallow_update: bool,
    pub disallow_end: bool,
}

impl TurnGuards {
    pub fn allows(&self, phase: TurnPhase) -> bool {
        !*self.flag(phase)
    }

    /// Returns `true` the first time a phase is claimed and sets its guard.
    pub fn claim(&mut self, phase: TurnPhase) -> bool {
        let flag = self.flag_mut(phase);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    /// Clears every guard, typically on a new player action.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn flag(&self, phase: TurnPhase) -> &bool {
        match phase {
            TurnPhase::Begin => &self.disallow_begin,
            TurnPhase::Update => &self.disallow_update,
            TurnPhase::End => &self.disallow_end,
        }
    }

    fn flag_mut(&mut self, phase: TurnPhase) -> &mut bool {
        match phase {
            TurnPhase::Begin => &mut self.disallow_begin,
            TurnPhase::Update => &mut self.disallow_update,
            TurnPhase::End => &mut self.disallow_end,
        }
    }
}

//=== Driver ==============================================================

/// A turn-cycle member: the owning entity and one of its components.
pub type TurnParticipant = (EntityRef, Rc<RefCell<dyn Component>>);

/// Runs one turn cycle over `participants`, phase by phase.
///
/// Components without the [`TurnBased`] capability are ignored. `frame`
/// is reported through the context as the current frame number. Returns
/// the number of turn-based components visited per phase.
pub fn run_turn_cycle(
    participants: &[TurnParticipant],
    turns: u64,
    frame: u64,
    messages: &mut MessageBus,
) -> usize {
    let mut visited = 0;

    for phase in TurnPhase::ALL {
        visited = 0;
        for (entity, component) in participants {
            let Ok(mut component) = component.try_borrow_mut() else {
                warn!(target: "system", "turn {:?}: component already borrowed, skipped", phase);
                continue;
            };
            let Some(turn_based) = component.as_turn_based() else {
                continue;
            };
            let mut ctx = FrameContext::new(0.0, frame, entity, messages);
            match phase {
                TurnPhase::Begin => turn_based.begin_turn(turns, &mut ctx),
                TurnPhase::Update => turn_based.update_turn(turns, &mut ctx),
                TurnPhase::End => turn_based.end_turn(turns, &mut ctx),
            }
            visited += 1;
        }
    }

    trace!(target: "system", "turn cycle ({} turns) visited {} components", turns, visited);
    visited
}

//=========================================================================
// Unit Tests
//=========================================================================
