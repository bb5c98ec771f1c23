//=========================================================================
// Scene System
//=========================================================================
//
// Level identifiers and the loader contract consumed by the session.
//
// Architecture:
//   SessionController
//     └─ SceneLoader (trait): load_additive() / unload_async()
//           └─ SceneRequestQueue (queues requests for the host)
//                 └─ LevelStack (host-side record of loaded levels)
//
// Requests are fire-and-forget. The controller never waits for a load
// or unload to complete, and a new level may start while the previous
// one is still unloading.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== Module Declarations =================================================

mod level_stack;
mod request_queue;

//=== Public API ==========================================================

pub use level_stack::LevelStack;
pub use request_queue::{SceneRequest, SceneRequestQueue};

//=== LevelId =============================================================

/// Name of a level scene.
///
/// An empty id is treated as "no level" wherever an optional level is
/// expected (see [`LevelId::non_empty`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns `Some(self)` unless the id is blank.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LevelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LevelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

//=== SceneLoader =========================================================

/// Host-side scene management, consumed by the session controller.
///
/// Both calls are asynchronous from the controller's point of view and
/// are assumed to succeed.
pub trait SceneLoader {
    /// Loads `level` on top of whatever is already loaded.
    fn load_additive(&mut self, level: &LevelId);

    /// Starts unloading `level`.
    fn unload_async(&mut self, level: &LevelId);
}

//=========================================================================
// Unit Tests
//=========================================================================
