//=========================================================================
// Aetheric Kit — Library Root
//=========================================================================
//
// Gameplay scaffolding for 2D games on top of a host engine:
//
// - Entities composed of components, updated per frame by ordered
//   component systems
// - Game states that decide which scene and UI overlay are active
// - Turn cycles for turn-based components
// - Input components fed by host callbacks (winit bridge included)
//
// Rendering, physics and the window event loop belong to the host.
//
// Typical usage:
// ```no_run
// use aetheric_kit::prelude::*;
//
// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)] enum State { Play }
// # impl StateKey for State {}
// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)] enum Stage { Level }
// # impl SceneKey for Stage {}
// # struct Level;
// # impl SceneController<State> for Level { fn setup(&mut self, _: &mut Scene) {} }
// let mut game = CoordinatorBuilder::new()
//     .with_state(StateDefinition::new(State::Play, Stage::Level))
//     .with_scene(Stage::Level, Level)
//     .with_initial_state(State::Play)
//     .build()?;
//
// game.start()?;
// game.update(1.0 / 60.0);
// # Ok::<(), Box<dyn std::error::Error>>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------

pub mod core;
pub mod platform;
pub mod prelude;
