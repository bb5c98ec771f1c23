//=========================================================================
// Shared Test Harness
//=========================================================================
//
// Drives a `SessionController` against in-memory collaborators.
//
// Only one controller may exist per process, so every `Harness` holds a
// process-wide lock for its lifetime.
//
//=========================================================================

#![allow(dead_code)]

use std::sync::{Mutex, MutexGuard};

use gameflow::prelude::*;

static SERIAL: Mutex<()> = Mutex::new(());

// Field order matters: the controller must drop before the lock.
pub struct Harness {
    pub session: SessionController,
    pub presentation: HeadlessPresentation,
    pub scenes: SceneRequestQueue,
    _serial: MutexGuard<'static, ()>,
}

impl Harness {
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_presentation(settings, HeadlessPresentation::new())
    }

    pub fn with_presentation(settings: SessionSettings, presentation: HeadlessPresentation) -> Self {
        let serial = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            session: SessionController::new(settings).expect("controller"),
            presentation,
            scenes: SceneRequestQueue::new(),
            _serial: serial,
        }
    }

    /// Menu, then play the first level, with scene requests cleared.
    pub fn in_level(settings: SessionSettings) -> Self {
        let mut harness = Self::new(settings);
        harness.menu();
        harness.play();
        harness.scenes.clear();
        harness
    }

    pub fn menu(&mut self) {
        let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
        self.session.show_main_menu(&mut ctx);
    }

    pub fn play(&mut self) {
        let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
        self.session.play(&mut ctx);
    }

    pub fn restart(&mut self) {
        let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
        self.session.restart_session(&mut ctx);
    }

    pub fn advance(&mut self) {
        let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
        self.session.advance_to_next_level(&mut ctx);
    }

    pub fn tick(&mut self, dt: f32) -> TickControl {
        self.tick_keys(dt, &[])
    }

    pub fn tick_keys(&mut self, dt: f32, keys: &[KeyCode]) -> TickControl {
        let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
        self.session.tick(&mut ctx, dt, keys)
    }

    pub fn message(&self) -> Option<&str> {
        self.presentation.text(LabelId::GameMessage)
    }
}

pub fn levels(ids: &[&str]) -> SessionSettings {
    SessionSettings {
        levels: ids.iter().map(|id| LevelId::new(*id)).collect(),
        ..SessionSettings::default()
    }
}

pub fn load(id: &str) -> SceneRequest {
    SceneRequest::LoadAdditive(LevelId::new(id))
}

pub fn unload(id: &str) -> SceneRequest {
    SceneRequest::Unload(LevelId::new(id))
}
