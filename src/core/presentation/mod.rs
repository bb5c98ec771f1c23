//=========================================================================
// Presentation
//=========================================================================
//
// The display/audio surface the session controller drives.
//
// The controller never renders anything. It names labels, screens,
// entities and clips, and the host decides what they look like. Every
// reference is optional: a missing label or screen is silently skipped.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use serde::{Deserialize, Serialize};

//=== Module Declarations =================================================

mod headless;

//=== Public API ==========================================================

pub use headless::{HeadlessPresentation, MusicChannel};

/// World-space hint for positional one-shot sounds.
pub type Position = (f32, f32, f32);

//=== LabelId =============================================================

/// Text labels the session writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LabelId {
    Title,
    Credits,
    Copyright,
    GameOver,
    GameMessage,
    ScoreTitle,
    ScoreValue,
    LivesTitle,
    LivesValue,
    TimerTitle,
    TimerValue,
}

impl LabelId {
    pub const ALL: [LabelId; 11] = [
        Self::Title,
        Self::Credits,
        Self::Copyright,
        Self::GameOver,
        Self::GameMessage,
        Self::ScoreTitle,
        Self::ScoreValue,
        Self::LivesTitle,
        Self::LivesValue,
        Self::TimerTitle,
        Self::TimerValue,
    ];
}

//=== ScreenId ============================================================

/// UI panels the session shows and hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScreenId {
    Menu,
    Hud,
    EndScreen,
    Footer,
}

impl ScreenId {
    pub const ALL: [ScreenId; 4] = [Self::Menu, Self::Hud, Self::EndScreen, Self::Footer];
}

//=== EntityId / ClipId ===================================================

/// In-world object the session may enable or disable (the player).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sound effect identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipId(String);

impl ClipId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=== AudioChannel ========================================================

/// Background music channel with volume control.
pub trait AudioChannel {
    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    /// Whether the channel has been faded to zero.
    fn is_silent(&self) -> bool {
        self.volume() <= 0.0
    }
}

//=== Presentation ========================================================

/// Text, screen, entity and audio calls consumed by the session.
///
/// # Minimal Implementation
///
/// Presence checks default to "present" and music defaults to "none":
///
/// ```rust
/// # use gameflow::prelude::*;
/// struct Console;
///
/// impl Presentation for Console {
///     fn set_text(&mut self, label: LabelId, text: &str) {
///         println!("{label:?}: {text}");
///     }
///     fn set_opacity(&mut self, _label: LabelId, _opacity: f32) {}
///     fn set_screen_visible(&mut self, _screen: ScreenId, _visible: bool) {}
///     fn set_entity_active(&mut self, _entity: &EntityId, _active: bool) {}
///     fn play_one_shot(&mut self, _clip: &ClipId, _position: Position) {}
/// }
/// ```
pub trait Presentation {
    /// Whether `label` is bound. Unbound labels are never written.
    fn has_label(&self, _label: LabelId) -> bool {
        true
    }

    /// Whether `screen` is bound. Unbound screens are never toggled.
    fn has_screen(&self, _screen: ScreenId) -> bool {
        true
    }

    fn set_text(&mut self, label: LabelId, text: &str);

    /// Sets label opacity in `[0, 1]`; used to hide the timer when untimed.
    fn set_opacity(&mut self, label: LabelId, opacity: f32);

    fn set_screen_visible(&mut self, screen: ScreenId, visible: bool);

    fn set_entity_active(&mut self, entity: &EntityId, active: bool);

    /// Background music channel, if the host has one.
    fn music(&mut self) -> Option<&mut dyn AudioChannel> {
        None
    }

    /// Fire-and-forget sound effect.
    fn play_one_shot(&mut self, clip: &ClipId, position: Position);
}
