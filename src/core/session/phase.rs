//=========================================================================
// Session Phase Machine
//=========================================================================
//
// The four-state game progression machine as an explicit data type.
//
// ```text
//   Playing ── dead, lives > 0 ───► Playing   (life lost, level retried)
//   Playing ── dead, lives == 0 ──► Death ───── music faded ──────► GameOver
//   Playing ── timer < 0 ─────────────────────────────────────────► GameOver
//   Playing ── score ≥ threshold ─► BeatLevel ─ faded, next level ► Playing
//                                   BeatLevel ─ faded, last level ► GameOver
// ```
//
// `Phase::step` is pure: it reads a snapshot of the session (`Facts`)
// and returns the `Step` the controller must carry out. The music fade
// that gates Death/BeatLevel runs before the snapshot is taken, so a
// fade that reaches silence transitions in the same tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Phase ===============================================================

/// Current state of the game progression machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// A level is in progress.
    #[default]
    Playing,

    /// Out of lives; waiting for the music to fade.
    Death,

    /// Session over. Sticky until a restart or a return to the menu.
    GameOver,

    /// Level completed; waiting for the music to fade.
    BeatLevel,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Death => "death",
            Self::GameOver => "game_over",
            Self::BeatLevel => "beat_level",
        }
    }

    /// Whether the phase fades background music before moving on.
    pub fn fades_music(&self) -> bool {
        matches!(self, Self::Death | Self::BeatLevel)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::GameOver)
    }

    //--- Transition Function ----------------------------------------------

    /// Decides what the controller does this tick.
    pub(crate) fn step(self, facts: &Facts) -> Step {
        match self {
            Self::Playing => {
                if facts.player_is_dead {
                    return if facts.lives > 0 {
                        Step::LoseLife
                    } else {
                        Step::Enter(Self::Death)
                    };
                }
                if facts.timed_out {
                    Step::Enter(Self::GameOver)
                } else if facts.beat_by_score {
                    Step::Enter(Self::BeatLevel)
                } else {
                    Step::Stay
                }
            }

            Self::Death => {
                if facts.music_done {
                    Step::Lose
                } else {
                    Step::Stay
                }
            }

            Self::BeatLevel => {
                if !facts.music_done {
                    Step::Stay
                } else if facts.has_next_level {
                    Step::Advance
                } else {
                    Step::Win
                }
            }

            Self::GameOver => Step::HoldGameOver,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=== Facts ===============================================================

/// Snapshot of the session read by [`Phase::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Facts {
    pub player_is_dead: bool,
    pub lives: u32,
    /// Timed level with the countdown below zero.
    pub timed_out: bool,
    /// Untimed level, beat-by-score enabled, threshold reached.
    pub beat_by_score: bool,
    /// Music faded to silence, or there is no music.
    pub music_done: bool,
    pub has_next_level: bool,
}

//=== Step ================================================================

/// Action chosen by the transition function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Nothing changes this tick.
    Stay,

    /// Spend a life and retry the current level (stays Playing).
    LoseLife,

    /// Plain phase change with no side effects.
    Enter(Phase),

    /// Play the end sound, show the lose message, go to GameOver.
    Lose,

    /// Play the transition sound and start the next level.
    Advance,

    /// Play the transition sound, show the win message, go to GameOver.
    Win,

    /// Keep the end screen up and the player disabled.
    HoldGameOver,
}

//=========================================================================
// Unit Tests
//=========================================================================
