//=========================================================================
// State Tracker
//=========================================================================
//
// Turns the platform's key transitions into per-frame presses.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys held) → was_pressed()
//
// Frame lifecycle: clear() → process_events() → query
//
// A key counts as pressed only on the frame it goes from up to down, so
// holding a binding never fires it twice.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode};
use super::InputSource;

//=== StateTracker ========================================================

/// Tracks keys held across frames and keys pressed this frame.
pub struct StateTracker {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_down: HashSet<KeyCode>,

    //--- Frame Deltas (reset each frame via clear()) --------------------
    keys_pressed_this_frame: HashSet<KeyCode>,
}

impl StateTracker {
    /// Creates a new state tracker with no keys held.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            keys_pressed_this_frame: HashSet::new(),
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears this frame's presses. Held keys stay held.
    pub fn clear(&mut self) {
        self.keys_pressed_this_frame.clear();
    }

    /// Processes input events, updating internal state.
    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            match event {
                InputEvent::KeyDown(key) => {
                    // Only a fresh transition counts
                    if self.keys_down.insert(*key) {
                        self.keys_pressed_this_frame.insert(*key);
                    }
                }
                InputEvent::KeyUp(key) => {
                    self.keys_down.remove(key);
                }
            }
        }
    }

    //--- Query API --------------------------------------------------------

    /// Returns `true` if key transitioned UP → DOWN this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed_this_frame.contains(&key)
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// The session reacts to discrete presses, not held keys.
impl InputSource for StateTracker {
    fn was_pressed(&self, key: KeyCode) -> bool {
        self.is_key_pressed(key)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
