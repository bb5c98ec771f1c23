//=========================================================================
// Scene Request Queue
//=========================================================================
//
// Queue of scene load/unload requests.
//
// The session controller issues requests here during a tick. The host
// drains the queue at the tick boundary and hands the requests to its
// actual loader.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{LevelId, SceneLoader};

//=== SceneRequest ========================================================

/// A single scene management request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    /// Load a level additively (existing scenes stay loaded).
    LoadAdditive(LevelId),

    /// Begin unloading a level.
    Unload(LevelId),
}

impl SceneRequest {
    pub fn level(&self) -> &LevelId {
        match self {
            Self::LoadAdditive(level) | Self::Unload(level) => level,
        }
    }
}

//=== SceneRequestQueue ===================================================

/// [`SceneLoader`] that records requests in FIFO order.
#[derive(Debug, Default)]
pub struct SceneRequestQueue {
    queue: Vec<SceneRequest>,
}

impl SceneRequestQueue {
    /// Creates a new empty request queue.
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Returns an iterator over the queued requests.
    pub fn iter(&self) -> impl Iterator<Item = &SceneRequest> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }

    /// Takes all requests from the queue, leaving it empty.
    pub fn take(&mut self) -> Vec<SceneRequest> {
        std::mem::take(&mut self.queue)
    }
}

impl SceneLoader for SceneRequestQueue {
    fn load_additive(&mut self, level: &LevelId) {
        debug!(target: "scene", "Queued additive load of {}", level);
        self.queue.push(SceneRequest::LoadAdditive(level.clone()));
    }

    fn unload_async(&mut self, level: &LevelId) {
        debug!(target: "scene", "Queued unload of {}", level);
        self.queue.push(SceneRequest::Unload(level.clone()));
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
