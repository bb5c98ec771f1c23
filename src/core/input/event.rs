//=========================================================================
// Input Event Types
//=========================================================================
//
// Engine-side representation of keyboard input.
//
// The platform layer translates window-system key events into these
// types before they cross the thread boundary. The session controller
// only ever sees `KeyCode`s through the `InputSource` trait.
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (pressed / held / released)
//         ↓
//    SessionController::tick()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use serde::{Deserialize, Serialize};

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Key bindings in [`crate::core::settings::KeyBindings`] are expressed
/// with these codes, so the enum is (de)serializable by variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,

    /// Fallback for keys the platform layer does not map. Never sent.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level key transition reported by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Key went down.
    KeyDown(KeyCode),

    /// Key went up.
    KeyUp(KeyCode),
}

//=========================================================================
// Unit Tests
//=========================================================================
