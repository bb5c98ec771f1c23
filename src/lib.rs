//=========================================================================
// gameflow: Library Root
//=========================================================================
//
// Frame-driven game session controller: score, lives, a level timer and
// the Playing → Death/BeatLevel → GameOver phase machine.
//
// Typical usage with your own engine:
// ```no_run
// use gameflow::prelude::*;
//
// let mut presentation = HeadlessPresentation::new();
// let mut scenes = SceneRequestQueue::new();
// let mut session = SessionController::new(SessionSettings::default())?;
//
// let mut ctx = SessionContext::new(&mut presentation, &mut scenes);
// session.show_main_menu(&mut ctx);
// loop {
//     if session.tick(&mut ctx, 1.0 / 60.0, &NO_KEYS) == TickControl::Exit {
//         break;
//     }
// }
// # Ok::<(), SessionError>(())
// ```
//
// Or with the bundled window runtime:
// ```no_run
// use gameflow::prelude::*;
//
// EngineBuilder::new(SessionSettings::default()).build()?.run()?;
// # Ok::<(), Box<dyn std::error::Error>>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the session controller and its collaborator traits.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` is the Winit window layer; it is not part of the public API.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{frame_duration, Engine, EngineBuilder};
