//=========================================================================
// Core Systems Orchestrator
//=========================================================================
//
// Runs the session controller on the logic (non-platform) thread.
//
// Architecture:
// ```text
//   Receiver<PlatformEvent> → EventCollector → StateTracker ─┐
//                                                            ▼
//               HeadlessPresentation ◄── SessionController::tick(dt)
//                                                            │
//               LevelStack ◄── SceneRequestQueue ◄───────────┘
//
//   TickControl::Exit → Sender<CoreEvent::Shutdown> → platform closes
// ```
//
// The orchestrator owns every collaborator directly and ticks at a fixed
// rate. It talks to the window thread only through channels.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod error;
pub mod input;
pub mod presentation;
pub mod scene;
pub mod session;
pub mod settings;

pub(crate) mod platform_bridge;

//=== Public API ==========================================================

pub use platform_bridge::PlatformError;

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use input::{InputEvent, StateTracker};
use platform_bridge::{CoreEvent, EventCollector, PlatformEvent};
use presentation::HeadlessPresentation;
use scene::{LevelStack, SceneRequestQueue};
use session::{SessionContext, SessionController};

//=== TickControl =========================================================

/// Control flow signal returned by each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== CoreSystemsOrchestrator =============================================

/// Owns the session and its collaborators on the logic thread.
pub(crate) struct CoreSystemsOrchestrator {
    session: SessionController,
    presentation: HeadlessPresentation,
    scenes: SceneRequestQueue,
    levels: LevelStack,
    input: StateTracker,
}

impl CoreSystemsOrchestrator {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(session: SessionController, presentation: HeadlessPresentation) -> Self {
        Self {
            session,
            presentation,
            scenes: SceneRequestQueue::new(),
            levels: LevelStack::new(),
            input: StateTracker::new(),
        }
    }

    //--- Frame Update -----------------------------------------------------

    /// Opens the main menu.
    pub(crate) fn boot(&mut self) {
        let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
        self.session.show_main_menu(&mut ctx);
        self.levels.apply(self.scenes.take());
    }

    /// Feeds one frame of input to the session and applies scene requests.
    pub(crate) fn step(&mut self, batches: &[Vec<InputEvent>], dt: f32) -> TickControl {
        self.input.clear();
        for batch in batches {
            self.input.process_events(batch);
        }

        let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
        let control = self.session.tick(&mut ctx, dt, &self.input);

        if !self.scenes.is_empty() {
            self.levels.apply(self.scenes.take());
            debug!(target: "engine", "Loaded levels: {:?}", self.levels.levels());
        }

        control
    }

    pub(crate) fn session(&self) -> &SessionController {
        &self.session
    }

    pub(crate) fn levels(&self) -> &LevelStack {
        &self.levels
    }

    #[cfg(test)]
    pub(crate) fn presentation(&self) -> &HeadlessPresentation {
        &self.presentation
    }

    //--- spawn_core_thread() ---------------------------------------------
    //
    // Each tick:
    //  1. Drains platform events (exit on window close)
    //  2. Ticks the session with the measured frame time
    //  3. Reports a session quit back to the platform
    //  4. Sleeps to keep the fixed pacing
    //
    pub(crate) fn spawn_core_thread(
        mut self,
        receiver: Receiver<PlatformEvent>,
        core_sender: Sender<CoreEvent>,
        frame_duration: Duration,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let mut collector = EventCollector::new(receiver);
            let mut last_tick = Instant::now();

            self.boot();

            loop {
                let frame_start = Instant::now();

                //--- Step 1: Gather platform events ------------------------
                if collector.collect_frame() == TickControl::Exit {
                    info!(target: "engine", "Window closed, core thread exiting");
                    break;
                }
                let batches = collector.take_batches();

                //--- Step 2: Tick the session ------------------------------
                let dt = frame_start.duration_since(last_tick).as_secs_f32();
                last_tick = frame_start;

                //--- Step 3: Forward quit requests -------------------------
                if self.step(&batches, dt) == TickControl::Exit {
                    info!(target: "engine", "Session quit, core thread exiting");
                    if core_sender.send(CoreEvent::Shutdown).is_err() {
                        warn!(target: "engine", "Platform already gone, shutdown not delivered");
                    }
                    break;
                }

                //--- Step 4: Maintain pacing -------------------------------
                let elapsed = frame_start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }

            let session = self.session();
            info!(
                target: "engine",
                "Final session: phase {}, score {}, lives {}, {} level(s) loaded",
                session.phase(),
                session.score(),
                session.lives(),
                self.levels().levels().len()
            );
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crate::core::presentation::ScreenId;
    use crate::core::scene::LevelId;
    use crate::core::settings::SessionSettings;
    use crossbeam_channel::unbounded;
    use std::sync::MutexGuard;

    // Lock first: bindings drop in reverse, so the controller goes before the lock.
    fn orchestrator(settings: SessionSettings) -> (MutexGuard<'static, ()>, CoreSystemsOrchestrator) {
        let serial = session::test_serial();
        let session = SessionController::new(settings).expect("controller");
        (serial, CoreSystemsOrchestrator::new(session, HeadlessPresentation::new()))
    }

    fn press(key: KeyCode) -> Vec<Vec<InputEvent>> {
        vec![vec![InputEvent::KeyDown(key), InputEvent::KeyUp(key)]]
    }

    #[test]
    fn boot_shows_main_menu() {
        let (_serial, mut core) = orchestrator(SessionSettings::default());

        core.boot();

        assert!(core.presentation().is_screen_visible(ScreenId::Menu));
        assert!(core.levels().is_empty());
    }

    #[test]
    fn play_key_loads_first_level() {
        let (_serial, mut core) = orchestrator(SessionSettings::default());
        core.boot();

        let control = core.step(&press(KeyCode::Enter), 0.016);

        assert_eq!(control, TickControl::Continue);
        assert_eq!(core.levels().top(), Some(&LevelId::new("Level1")));
    }

    #[test]
    fn held_key_fires_once() {
        let (_serial, mut core) = orchestrator(SessionSettings::default());
        core.boot();

        core.step(&[vec![InputEvent::KeyDown(KeyCode::KeyR)]], 0.016);
        core.step(&[], 0.016);

        assert_eq!(core.levels().levels(), &[LevelId::new("Level1")]);
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let (_serial, mut core) = orchestrator(SessionSettings::default());
        core.boot();

        assert_eq!(core.step(&press(KeyCode::Escape), 0.016), TickControl::Exit);
    }

    #[test]
    fn core_thread_reports_quit_to_platform() {
        let (_serial, core) = orchestrator(SessionSettings::default());
        let (platform_tx, platform_rx) = unbounded();
        let (core_tx, core_rx) = unbounded();

        platform_tx
            .send(PlatformEvent::Inputs(vec![InputEvent::KeyDown(KeyCode::Escape)]))
            .unwrap();
        let handle = core.spawn_core_thread(platform_rx, core_tx, Duration::from_millis(4));

        assert_eq!(
            core_rx.recv_timeout(Duration::from_secs(5)),
            Ok(CoreEvent::Shutdown)
        );
        handle.join().expect("core thread");
    }

    #[test]
    fn core_thread_exits_on_window_close() {
        let (_serial, core) = orchestrator(SessionSettings::default());
        let (platform_tx, platform_rx) = unbounded();
        let (core_tx, core_rx) = unbounded();

        platform_tx.send(PlatformEvent::WindowClosed).unwrap();
        let handle = core.spawn_core_thread(platform_rx, core_tx, Duration::from_millis(4));

        handle.join().expect("core thread");
        assert!(core_rx.try_recv().is_err());
    }
}
