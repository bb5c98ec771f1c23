//=========================================================================
// Engine
//=========================================================================
//
// Reference host runtime: a window plus a session thread.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──run()──>  [Runtime]
//         │                          │
//         ├─ with_tps()              ├─ spawns the session thread
//         ├─ with_channel_capacity() ├─ runs the platform (main thread)
//         └─ with_title()            └─ blocks until exit
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::error::SessionError;
use crate::core::platform_bridge::{CoreEvent, PlatformError, PlatformEvent};
use crate::core::presentation::HeadlessPresentation;
use crate::core::session::SessionController;
use crate::core::settings::SessionSettings;
use crate::core::CoreSystemsOrchestrator;
use crate::platform::Platform;

//=== Tick Rate ===========================================================

/// Fixed frame time for `tps` ticks per second.
///
/// `None` when the rate is not finite, not positive, or so small that one
/// frame would not fit in a [`Duration`].
pub fn frame_duration(tps: f64) -> Option<Duration> {
    if !(tps.is_finite() && tps > 0.0) {
        return None;
    }
    Duration::try_from_secs_f64(1.0 / tps).ok()
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (session ticks per second)
/// - **Channel capacity**: 128 events
/// - **Title**: the configured game title
///
/// # Examples
///
/// ```no_run
/// use gameflow::prelude::*;
///
/// EngineBuilder::new(SessionSettings::default())
///     .with_tps(120.0)
///     .build()
///     .expect("no other session running")
///     .run()
///     .expect("window system available");
/// ```
pub struct EngineBuilder {
    settings: SessionSettings,
    tps: f64,
    frame: Duration,
    channel_capacity: usize,
    title: Option<String>,
}

impl EngineBuilder {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            tps: 60.0,
            frame: Duration::from_secs(1) / 60,
            channel_capacity: 128,
            title: None,
        }
    }

    /// Sets the target ticks per second for the session thread.
    ///
    /// # Panics
    ///
    /// Panics if [`frame_duration`] rejects `tps`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        let Some(frame) = frame_duration(tps) else {
            panic!("TPS must be positive and finite, got {}", tps);
        };
        self.tps = tps;
        self.frame = frame;
        self
    }

    /// Sets the channel capacity for platform → core communication.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Overrides the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Creates the session controller and the engine around it.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyRunning`] if a controller already exists.
    pub fn build(self) -> Result<Engine, SessionError> {
        info!(
            target: "engine",
            "Building engine (TPS: {}, channel: {})",
            self.tps, self.channel_capacity
        );

        let title = self
            .title
            .unwrap_or_else(|| self.settings.text.game_title.clone());
        let session = SessionController::new(self.settings)?;
        let presentation = HeadlessPresentation::new().with_music(1.0);

        Ok(Engine {
            orchestrator: CoreSystemsOrchestrator::new(session, presentation),
            tps: self.tps,
            frame: self.frame,
            channel_capacity: self.channel_capacity,
            title,
        })
    }
}

//=== Engine ==============================================================

/// Session runtime.
///
/// ```text
/// Engine (Main Thread)
///   ├─► CoreSystemsOrchestrator (Session Thread @ TPS)
///   │     └─► SessionController, StateTracker, LevelStack
///   │
///   └─► Platform (Event Loop)
///         └─► Window, Keyboard
///
/// Communication: crossbeam channels (PlatformEvent / CoreEvent)
/// ```
pub struct Engine {
    orchestrator: CoreSystemsOrchestrator,
    tps: f64,
    frame: Duration,
    channel_capacity: usize,
    title: String,
}

impl Engine {
    /// Runs the window and the session until either side exits.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → core and core → platform channels
    /// 2. Spawns the session thread at the configured TPS
    /// 3. Runs the platform event loop (blocks here)
    /// 4. Joins the session thread
    ///
    /// # Errors
    ///
    /// [`PlatformError`] if the window system fails. The session thread is
    /// still joined first.
    pub fn run(self) -> Result<(), PlatformError> {
        info!(target: "engine", "Starting engine runtime (TPS: {})", self.tps);

        //--- 1. Create communication channels ----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);
        let (core_tx, core_rx): (Sender<CoreEvent>, Receiver<CoreEvent>) = bounded(1);

        //--- 2. Spawn the session thread ----------------------------------
        let core_handle = self.orchestrator.spawn_core_thread(rx, core_tx, self.frame);
        info!(target: "engine", "Session thread spawned");

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(self.title, tx.clone(), core_rx);
        let result = platform.run();

        if let Err(e) = &result {
            error!(target: "engine", "Platform error: {}", e);
        }
        info!(target: "engine", "Platform event loop exited");

        //--- 4. Cleanup: wait for the session thread ---------------------
        let _ = tx.send(PlatformEvent::WindowClosed);
        drop(tx);
        match core_handle.join() {
            Ok(()) => info!(target: "engine", "Session thread terminated cleanly"),
            Err(e) => error!(target: "engine", "Session thread panicked: {:?}", e),
        }

        info!(target: "engine", "Engine shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
