//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use gameflow::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Runtime
pub use crate::core::TickControl;
pub use crate::engine::{frame_duration, Engine, EngineBuilder};

// Session
pub use crate::core::error::{ConfigError, SessionError};
pub use crate::core::session::{Phase, SessionContext, SessionController, SessionState};
pub use crate::core::settings::SessionSettings;

// Collaborators
pub use crate::core::input::{InputSource, KeyCode, StateTracker, NO_KEYS};
pub use crate::core::presentation::{
    AudioChannel, ClipId, EntityId, HeadlessPresentation, LabelId, Position, Presentation, ScreenId,
};
pub use crate::core::scene::{LevelId, LevelStack, SceneLoader, SceneRequest, SceneRequestQueue};
