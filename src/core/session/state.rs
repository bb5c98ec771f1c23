//=========================================================================
// Session State
//=========================================================================
//
// Counters, phase, timer and level bookkeeping for one play session.
//
// Owned by the `SessionController`; readers get `&SessionState`,
// mutation goes through controller operations so phase changes stay
// inside the transition table.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::phase::Phase;
use crate::core::scene::LevelId;
use crate::core::settings::SessionSettings;

//=== SessionState ========================================================

/// Mutable state of a play session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub(crate) score: i64,
    pub(crate) lives: u32,
    pub(crate) phase: Phase,
    pub(crate) remaining_time: Option<f32>,

    //--- Levels -----------------------------------------------------------
    pub(crate) first_level: Option<LevelId>,
    pub(crate) current_level: Option<LevelId>,
    pub(crate) next_level: Option<LevelId>,
    pub(crate) level_to_load: Option<LevelId>,

    //--- Flags ------------------------------------------------------------
    pub(crate) player_is_dead: bool,
    pub(crate) music_faded: bool,
    /// Volume the music had when the current fade started.
    pub(crate) music_restore: Option<f32>,
    pub(crate) quit_requested: bool,
}

impl SessionState {
    /// Fresh state with counters at their configured defaults.
    pub fn new(settings: &SessionSettings) -> Self {
        let first_level = settings.first_level();
        Self {
            score: settings.rules.default_score,
            lives: settings.rules.default_lives,
            phase: Phase::Playing,
            remaining_time: None,
            level_to_load: first_level.clone(),
            first_level,
            current_level: None,
            next_level: None,
            player_is_dead: false,
            music_faded: false,
            music_restore: None,
            quit_requested: false,
        }
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds left on a timed level; `None` when untimed.
    pub fn remaining_time(&self) -> Option<f32> {
        self.remaining_time
    }

    pub fn first_level(&self) -> Option<&LevelId> {
        self.first_level.as_ref()
    }

    /// Level currently loaded, `None` while on the main menu.
    pub fn current_level(&self) -> Option<&LevelId> {
        self.current_level.as_ref()
    }

    /// Successor of the current level; `None` on the last level.
    pub fn next_level(&self) -> Option<&LevelId> {
        self.next_level.as_ref()
    }

    /// Level the menu's play action starts.
    pub fn level_to_load(&self) -> Option<&LevelId> {
        self.level_to_load.as_ref()
    }

    pub fn player_is_dead(&self) -> bool {
        self.player_is_dead
    }

    pub fn music_faded(&self) -> bool {
        self.music_faded
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Whether a level is loaded and the phase machine is running.
    pub fn in_level(&self) -> bool {
        self.current_level.is_some()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
