//=========================================================================
// State Machine
//=========================================================================
//
// Holds every game state and the pointer to the current one; enforces
// the transition graph.
//
// enter(target):
//   validate (registered? started? edge declared?) → reject, no mutation
//   current.will_exit(target) → swap pointer → target.did_enter(previous)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::debug;

//=== Internal Dependencies ===============================================

use super::{GameState, StateKey};
use crate::core::entity::EntityRef;
use crate::core::error::{ConfigError, StateError};
use crate::core::observable::{log_sink, Observable};
use crate::core::scene::SceneKey;

//=== Transition ==========================================================

/// A completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S: StateKey> {
    /// `None` for the initial entry.
    pub from: Option<S>,
    pub to: S,
}

//=== StateMachine ========================================================

/// Directed graph of game states with a single current state.
pub struct StateMachine<S: StateKey, C: SceneKey> {
    states: HashMap<S, Box<dyn GameState<S, C>>>,
    order: Vec<S>,
    current: Observable<Option<S>>,
}

impl<S: StateKey, C: SceneKey> StateMachine<S, C> {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            order: Vec::new(),
            current: Observable::new("current_state", None),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a state. Each key may be registered once.
    pub fn add_state(&mut self, state: Box<dyn GameState<S, C>>) -> Result<(), ConfigError> {
        let key = state.key();
        if self.states.contains_key(&key) {
            return Err(ConfigError::DuplicateState(format!("{key:?}")));
        }
        self.order.push(key);
        self.states.insert(key, state);
        Ok(())
    }

    /// Checks that every declared next state is registered.
    pub fn validate_graph(&self) -> Result<(), ConfigError> {
        for key in &self.order {
            let Some(state) = self.states.get(key) else {
                continue;
            };
            if let Some(missing) = state
                .valid_next_states()
                .iter()
                .find(|next| !self.states.contains_key(*next))
            {
                return Err(ConfigError::DanglingTransition {
                    from: format!("{key:?}"),
                    to: format!("{missing:?}"),
                });
            }
        }
        Ok(())
    }

    /// Logs every change of the current state under the `observable` target.
    pub fn set_state_logging(&mut self, enabled: bool) {
        self.current.set_sink(enabled.then(log_sink::<Option<S>>));
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains(&self, key: S) -> bool {
        self.states.contains_key(&key)
    }

    pub fn state(&self, key: S) -> Option<&dyn GameState<S, C>> {
        self.states.get(&key).map(|s| &**s)
    }

    /// Registered keys in registration order.
    pub fn state_keys(&self) -> &[S] {
        &self.order
    }

    pub fn current(&self) -> Option<S> {
        *self.current.get()
    }

    pub fn current_state(&self) -> Option<&dyn GameState<S, C>> {
        self.current().and_then(|key| self.state(key))
    }

    /// Checks whether `target` could be entered right now.
    pub fn validate(&self, target: S) -> Result<(), StateError<S>> {
        if !self.contains(target) {
            return Err(StateError::UnknownState(target));
        }
        let Some(from) = self.current() else {
            return Err(StateError::NotStarted);
        };
        match self.states.get(&from) {
            Some(state) if state.is_valid_next_state(target) => Ok(()),
            _ => Err(StateError::InvalidTransition { from, to: target }),
        }
    }

    pub fn can_enter(&self, target: S) -> bool {
        self.validate(target).is_ok()
    }

    //--- Transitions ------------------------------------------------------

    /// Enters the initial state. No graph edge is required.
    pub fn start(&mut self, initial: S, global: &EntityRef) -> Result<Transition<S>, StateError<S>> {
        if self.current().is_some() {
            return Err(StateError::AlreadyStarted);
        }
        let Some(state) = self.states.get_mut(&initial) else {
            return Err(StateError::UnknownState(initial));
        };

        self.current.set(Some(initial));
        state.did_enter(None, global);
        debug!(target: "state", "started in {:?}", initial);

        Ok(Transition { from: None, to: initial })
    }

    /// Moves to `target` if the current state declares it as a next state.
    ///
    /// On error nothing changes and no hook runs.
    pub fn enter(&mut self, target: S, global: &EntityRef) -> Result<Transition<S>, StateError<S>> {
        self.validate(target)?;
        let Some(from) = self.current() else {
            return Err(StateError::NotStarted);
        };

        if let Some(outgoing) = self.states.get_mut(&from) {
            outgoing.will_exit(target, global);
        }
        self.current.set(Some(target));
        if let Some(incoming) = self.states.get_mut(&target) {
            incoming.did_enter(Some(from), global);
        }
        debug!(target: "state", "{:?} → {:?}", from, target);

        Ok(Transition { from: Some(from), to: target })
    }
}

impl<S: StateKey, C: SceneKey> Default for StateMachine<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::Entity;
    use crate::core::state::StateDefinition;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum State {
        Logo,
        Title,
        Play,
        Paused,
        GameOver,
    }

    impl StateKey for State {}

    const ALL: [State; 5] = [State::Logo, State::Title, State::Play, State::Paused, State::GameOver];

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Stage {
        Intro,
        Level,
    }

    impl SceneKey for Stage {}

    fn edges(state: State) -> Vec<State> {
        match state {
            State::Logo => vec![State::Title],
            State::Title => vec![State::Play],
            State::Play => vec![State::Paused, State::GameOver],
            State::Paused => vec![State::Play, State::GameOver, State::Title],
            State::GameOver => vec![State::Title, State::Play],
        }
    }

    fn machine() -> StateMachine<State, Stage> {
        let mut machine = StateMachine::new();
        for state in ALL {
            let scene = if state == State::Logo { Stage::Intro } else { Stage::Level };
            machine
                .add_state(Box::new(StateDefinition::new(state, scene).leads_to(edges(state))))
                .expect("unique state");
        }
        machine
    }

    /// Walks the graph from Logo to `target` along declared edges.
    fn machine_in(target: State, global: &EntityRef) -> StateMachine<State, Stage> {
        let path: &[State] = match target {
            State::Logo => &[],
            State::Title => &[State::Title],
            State::Play => &[State::Title, State::Play],
            State::Paused => &[State::Title, State::Play, State::Paused],
            State::GameOver => &[State::Title, State::Play, State::GameOver],
        };
        let mut machine = machine();
        machine.start(State::Logo, global).expect("start");
        for step in path {
            machine.enter(*step, global).expect("path follows edges");
        }
        machine
    }

    //--- Hook recording state ---------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorded {
        key: State,
        next: Vec<State>,
        log: Log,
    }

    impl GameState<State, Stage> for Recorded {
        fn key(&self) -> State {
            self.key
        }
        fn scene(&self) -> Stage {
            Stage::Level
        }
        fn valid_next_states(&self) -> &[State] {
            &self.next
        }
        fn did_enter(&mut self, previous: Option<State>, _global: &EntityRef) {
            self.log.borrow_mut().push(format!("enter {:?} from {:?}", self.key, previous));
        }
        fn will_exit(&mut self, next: State, _global: &EntityRef) {
            self.log.borrow_mut().push(format!("exit {:?} to {:?}", self.key, next));
        }
    }

    //=====================================================================
    // Transition Validity
    //=====================================================================

    #[test]
    fn play_cannot_return_to_title() {
        let global = Entity::new().into_ref();
        let mut machine = machine_in(State::Play, &global);

        let err = machine.enter(State::Title, &global).unwrap_err();
        assert_eq!(err, StateError::InvalidTransition { from: State::Play, to: State::Title });
        assert_eq!(machine.current(), Some(State::Play));
    }

    #[test]
    fn paused_can_return_to_title() {
        let global = Entity::new().into_ref();
        let mut machine = machine_in(State::Paused, &global);

        let transition = machine.enter(State::Title, &global).expect("declared edge");
        assert_eq!(transition, Transition { from: Some(State::Paused), to: State::Title });
        assert_eq!(machine.current(), Some(State::Title));
    }

    #[test]
    fn enter_before_start_is_rejected() {
        let global = Entity::new().into_ref();
        let mut machine = machine();
        assert_eq!(machine.enter(State::Title, &global), Err(StateError::NotStarted));
        assert_eq!(machine.current(), None);
    }

    #[test]
    fn start_twice_is_rejected() {
        let global = Entity::new().into_ref();
        let mut machine = machine_in(State::Logo, &global);
        assert_eq!(machine.start(State::Logo, &global), Err(StateError::AlreadyStarted));
    }

    #[test]
    fn unknown_target_is_rejected() {
        let global = Entity::new().into_ref();
        let mut machine: StateMachine<State, Stage> = StateMachine::new();
        machine
            .add_state(Box::new(StateDefinition::new(State::Logo, Stage::Intro).leads_to([State::Title])))
            .expect("unique");
        machine.start(State::Logo, &global).expect("start");

        assert_eq!(machine.enter(State::Title, &global), Err(StateError::UnknownState(State::Title)));
    }

    #[test]
    fn self_loop_requires_declaration() {
        let global = Entity::new().into_ref();
        let mut machine: StateMachine<State, Stage> = StateMachine::new();
        machine
            .add_state(Box::new(StateDefinition::new(State::Play, Stage::Level).leads_to([State::Play])))
            .expect("unique");
        machine
            .add_state(Box::new(StateDefinition::new(State::Title, Stage::Level)))
            .expect("unique");
        machine.start(State::Play, &global).expect("start");
        assert!(machine.enter(State::Play, &global).is_ok());

        let mut title = machine_in(State::Title, &global);
        assert!(!title.can_enter(State::Title));
        assert!(title.enter(State::Title, &global).is_err());
    }

    proptest! {
        #[test]
        fn enter_succeeds_iff_edge_declared(from in 0usize..5, to in 0usize..5) {
            let (from, to) = (ALL[from], ALL[to]);
            let global = Entity::new().into_ref();
            let mut machine = machine_in(from, &global);

            let result = machine.enter(to, &global);
            prop_assert_eq!(result.is_ok(), edges(from).contains(&to));
            let expected = if result.is_ok() { to } else { from };
            prop_assert_eq!(machine.current(), Some(expected));
        }
    }

    //=====================================================================
    // Hooks & Configuration
    //=====================================================================

    #[test]
    fn hooks_run_exit_then_enter() {
        let global = Entity::new().into_ref();
        let log: Log = Rc::default();
        let mut machine: StateMachine<State, Stage> = StateMachine::new();
        for (key, next) in [(State::Title, vec![State::Play]), (State::Play, vec![])] {
            machine
                .add_state(Box::new(Recorded { key, next, log: log.clone() }))
                .expect("unique");
        }

        machine.start(State::Title, &global).expect("start");
        machine.enter(State::Play, &global).expect("edge");
        assert!(machine.enter(State::Title, &global).is_err());

        assert_eq!(
            *log.borrow(),
            vec![
                "enter Title from None".to_string(),
                "exit Title to Play".to_string(),
                "enter Play from Some(Title)".to_string(),
            ]
        );
    }

    #[test]
    fn duplicate_state_is_a_config_error() {
        let mut machine = machine();
        let err = machine
            .add_state(Box::new(StateDefinition::new(State::Play, Stage::Level)))
            .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateState("Play".into()));
    }

    #[test]
    fn dangling_edge_is_detected() {
        let mut machine: StateMachine<State, Stage> = StateMachine::new();
        machine
            .add_state(Box::new(StateDefinition::new(State::Play, Stage::Level).leads_to([State::GameOver])))
            .expect("unique");
        assert_eq!(
            machine.validate_graph(),
            Err(ConfigError::DanglingTransition { from: "Play".into(), to: "GameOver".into() })
        );
        assert!(self::machine().validate_graph().is_ok());
    }
}
