//=========================================================================
// Error Types
//=========================================================================
//
// Failures that cross an API boundary.
//
// Per-frame work never produces errors (absence is an Option and is
// skipped). Only two places report failure to a caller:
//   StateMachine / GameCoordinator::enter()  → StateError
//   CoordinatorBuilder::build()              → ConfigError
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::state::StateKey;

//=== StateError ==========================================================

/// Rejected state transition.
///
/// A rejected transition never mutates the state machine: the current
/// state, scene and UI overlay stay exactly as they were.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError<S: StateKey> {
    /// The target state was never registered.
    #[error("state {0:?} is not registered")]
    UnknownState(S),

    /// The target is not in the current state's valid-next-states set.
    #[error("{to:?} is not a valid next state of {from:?}")]
    InvalidTransition {
        /// State that was current when the request was made.
        from: S,
        /// Requested target state.
        to: S,
    },

    /// `enter()` was called before the coordinator entered its initial state.
    #[error("coordinator has not been started")]
    NotStarted,

    /// `start()` was called twice.
    #[error("coordinator was already started")]
    AlreadyStarted,
}

//=== ConfigError =========================================================

/// Invalid coordinator configuration, reported by `CoordinatorBuilder::build`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No initial state was given to the builder.
    #[error("no initial state was configured")]
    MissingInitialState,

    /// The initial state is not among the registered states.
    #[error("initial state {0} is not registered")]
    UnknownInitialState(String),

    /// Two states share the same key.
    #[error("state {0} is registered more than once")]
    DuplicateState(String),

    /// A state lists a next state that was never registered.
    #[error("state {from} lists unregistered next state {to}")]
    DanglingTransition {
        /// State declaring the edge.
        from: String,
        /// Missing target.
        to: String,
    },

    /// A state is associated with a scene nobody can build.
    #[error("state {state} uses scene {scene}, which has no controller")]
    MissingSceneController {
        /// State referring to the scene.
        state: String,
        /// Scene key without a controller.
        scene: String,
    },

    /// Two controllers were registered for the same scene key.
    #[error("scene {0} has more than one controller")]
    DuplicateSceneController(String),
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestState {
        Title,
        Play,
    }

    impl StateKey for TestState {}

    #[test]
    fn invalid_transition_names_both_states() {
        let err = StateError::InvalidTransition { from: TestState::Play, to: TestState::Title };
        let message = err.to_string();
        assert!(message.contains("Play"));
        assert!(message.contains("Title"));
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<StateError<TestState>>();
        assert_error::<ConfigError>();
    }

    #[test]
    fn dangling_transition_display() {
        let err = ConfigError::DanglingTransition { from: "Play".into(), to: "Credits".into() };
        assert_eq!(err.to_string(), "state Play lists unregistered next state Credits");
    }
}
