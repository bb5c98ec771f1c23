//=========================================================================
// Level Stack
//=========================================================================
//
// Host-side record of which level scenes are loaded.
//
// Additive loads push onto the stack; unloads remove a level wherever
// it sits. The topmost level is the one most recently loaded.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{LevelId, SceneRequest};

//=== LevelStack ==========================================================

/// Stack of loaded levels, driven by [`SceneRequest`]s.
#[derive(Debug, Default)]
pub struct LevelStack {
    stack: Vec<LevelId>,
}

impl LevelStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    //--- Request Processing -----------------------------------------------

    /// Applies requests in FIFO order.
    pub fn apply<I>(&mut self, requests: I)
    where
        I: IntoIterator<Item = SceneRequest>,
    {
        for request in requests {
            match request {
                SceneRequest::LoadAdditive(level) => self.load(level),
                SceneRequest::Unload(level) => self.unload(&level),
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_loaded(&self, level: &LevelId) -> bool {
        self.stack.contains(level)
    }

    /// Most recently loaded level.
    pub fn top(&self) -> Option<&LevelId> {
        self.stack.last()
    }

    pub fn levels(&self) -> &[LevelId] {
        &self.stack
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    //--- Internal Helpers -------------------------------------------------

    fn load(&mut self, level: LevelId) {
        // A level still being unloaded may be requested again; keep one entry.
        if self.stack.contains(&level) {
            warn!(target: "scene", "Level {} is already loaded, skipping load", level);
            return;
        }

        debug!(target: "scene", "Loading level {} additively", level);
        self.stack.push(level);
    }

    fn unload(&mut self, level: &LevelId) {
        if let Some(pos) = self.stack.iter().position(|l| l == level) {
            debug!(target: "scene", "Unloading level {} at position {}", level, pos);
            self.stack.remove(pos);
        } else {
            debug!(target: "scene", "Level {} not loaded, skipping unload", level);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
