//=========================================================================
// Headless Presentation
//=========================================================================
//
// In-memory `Presentation` that records everything the session asks
// for and logs each visible change.
//
// Used by the reference runtime (no renderer) and by tests to assert on
// what a player would see.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use super::{AudioChannel, ClipId, EntityId, LabelId, Position, Presentation, ScreenId};

//=== MusicChannel ========================================================

/// Volume-only music channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicChannel {
    volume: f32,
}

impl MusicChannel {
    pub fn new(volume: f32) -> Self {
        Self { volume }
    }
}

impl AudioChannel for MusicChannel {
    fn volume(&self) -> f32 {
        self.volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

//=== HeadlessPresentation ================================================

/// Records labels, screens, entities and audio calls.
#[derive(Debug, Default)]
pub struct HeadlessPresentation {
    labels: HashMap<LabelId, String>,
    opacity: HashMap<LabelId, f32>,
    screens: HashMap<ScreenId, bool>,
    entities: HashMap<EntityId, bool>,
    music: Option<MusicChannel>,
    played: Vec<ClipId>,

    //--- Unbound references -----------------------------------------------
    missing_labels: HashSet<LabelId>,
    missing_screens: HashSet<ScreenId>,
}

impl HeadlessPresentation {
    //--- Construction -----------------------------------------------------

    /// Creates a presentation with every label and screen bound and no music.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a background music channel at `volume`.
    pub fn with_music(mut self, volume: f32) -> Self {
        self.music = Some(MusicChannel::new(volume));
        self
    }

    /// Marks `label` as unbound.
    pub fn without_label(mut self, label: LabelId) -> Self {
        self.missing_labels.insert(label);
        self
    }

    /// Marks `screen` as unbound.
    pub fn without_screen(mut self, screen: ScreenId) -> Self {
        self.missing_screens.insert(screen);
        self
    }

    //--- Queries ----------------------------------------------------------

    /// Current text of `label`, if it was ever written.
    pub fn text(&self, label: LabelId) -> Option<&str> {
        self.labels.get(&label).map(String::as_str)
    }

    /// Label opacity (labels start fully opaque).
    pub fn opacity(&self, label: LabelId) -> f32 {
        self.opacity.get(&label).copied().unwrap_or(1.0)
    }

    pub fn is_screen_visible(&self, screen: ScreenId) -> bool {
        self.screens.get(&screen).copied().unwrap_or(false)
    }

    /// Visible screens in declaration order.
    pub fn visible_screens(&self) -> Vec<ScreenId> {
        ScreenId::ALL
            .into_iter()
            .filter(|screen| self.is_screen_visible(*screen))
            .collect()
    }

    /// `None` if the entity was never touched.
    pub fn is_entity_active(&self, entity: &EntityId) -> Option<bool> {
        self.entities.get(entity).copied()
    }

    pub fn music_volume(&self) -> Option<f32> {
        self.music.map(|m| m.volume)
    }

    /// Clips played so far, oldest first.
    pub fn played_clips(&self) -> &[ClipId] {
        &self.played
    }
}

//=== Presentation ========================================================

impl Presentation for HeadlessPresentation {
    fn has_label(&self, label: LabelId) -> bool {
        !self.missing_labels.contains(&label)
    }

    fn has_screen(&self, screen: ScreenId) -> bool {
        !self.missing_screens.contains(&screen)
    }

    fn set_text(&mut self, label: LabelId, text: &str) {
        // HUD values are refreshed every tick; only log real changes
        if self.labels.get(&label).map(String::as_str) == Some(text) {
            return;
        }
        trace!(target: "presentation", "{:?} = {:?}", label, text);
        self.labels.insert(label, text.to_owned());
    }

    fn set_opacity(&mut self, label: LabelId, opacity: f32) {
        self.opacity.insert(label, opacity);
    }

    fn set_screen_visible(&mut self, screen: ScreenId, visible: bool) {
        let previous = self.screens.insert(screen, visible);
        if previous != Some(visible) {
            debug!(
                target: "presentation",
                "Screen {:?} {}",
                screen,
                if visible { "shown" } else { "hidden" }
            );
        }
    }

    fn set_entity_active(&mut self, entity: &EntityId, active: bool) {
        let previous = self.entities.insert(entity.clone(), active);
        if previous != Some(active) {
            debug!(target: "presentation", "Entity {} active = {}", entity, active);
        }
    }

    fn music(&mut self) -> Option<&mut dyn AudioChannel> {
        self.music.as_mut().map(|m| m as &mut dyn AudioChannel)
    }

    fn play_one_shot(&mut self, clip: &ClipId, position: Position) {
        info!(target: "presentation", "Playing {} at {:?}", clip, position);
        self.played.push(clip.clone());
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
