//=========================================================================
// Input
//=========================================================================
//
// Keyboard input as seen by the session controller.
//
// Architecture:
//   InputEvent (platform) → StateTracker → InputSource::was_pressed()
//
// The controller polls an `InputSource` once per tick for each key it
// recognizes. Any type that can answer "did this key go down this frame"
// can drive it: the runtime uses `StateTracker`, tests use key arrays.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode};
pub use state_tracker::StateTracker;

//=== InputSource =========================================================

/// Discrete key-down source polled once per tick.
pub trait InputSource {
    /// Returns `true` if `key` went down during the current frame.
    fn was_pressed(&self, key: KeyCode) -> bool;
}

impl InputSource for [KeyCode] {
    fn was_pressed(&self, key: KeyCode) -> bool {
        self.contains(&key)
    }
}

impl<const N: usize> InputSource for [KeyCode; N] {
    fn was_pressed(&self, key: KeyCode) -> bool {
        self.contains(&key)
    }
}

/// Convenience input source with no keys pressed.
pub const NO_KEYS: [KeyCode; 0] = [];

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_and_arrays_act_as_input_sources() {
        let keys = [KeyCode::KeyR, KeyCode::Escape];
        assert!(keys.was_pressed(KeyCode::KeyR));
        assert!(!keys.was_pressed(KeyCode::KeyG));

        let slice: &[KeyCode] = &keys;
        assert!(slice.was_pressed(KeyCode::Escape));

        assert!(!NO_KEYS.was_pressed(KeyCode::Escape));
    }
}
