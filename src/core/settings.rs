//=========================================================================
// Session Settings
//=========================================================================
//
// Tunable text, rules, level order, audio and key bindings.
//
// Settings are plain data loaded from RON. Every field has a built-in
// default, so a config file only needs the values it changes:
//
// ```text
// (
//     text: (game_title: "Pong Again"),
//     rules: (timed_level: true, start_time: 30.0),
//     levels: ["Level1", "Level2"],
// )
// ```
//
// Validation is non-fatal: `validate()` returns human-readable warnings.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::error::ConfigError;
use crate::core::input::KeyCode;
use crate::core::presentation::{ClipId, EntityId, Position};
use crate::core::scene::LevelId;

//=== TextSettings ========================================================

/// Strings written to menu, HUD and end-screen labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSettings {
    pub game_title: String,
    pub game_credits: String,
    pub copyright: String,
    pub game_over: String,
    pub lose_message: String,
    pub win_message: String,
    pub score_title: String,
    pub lives_title: String,
    pub timer_title: String,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            game_title: "Gamey Game".into(),
            game_credits: "Made with gameflow".into(),
            copyright: format!("Copyright {}", chrono::Local::now().year()),
            game_over: "Game Over".into(),
            lose_message: "Heh you lost".into(),
            win_message: "I guess you won, congrats.".into(),
            score_title: "Score: ".into(),
            lives_title: "Lives: ".into(),
            timer_title: "Timer: ".into(),
        }
    }
}

//=== RuleSettings ========================================================

/// Counter defaults and level-completion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub default_score: i64,
    pub default_lives: u32,
    /// Reaching `beat_level_score` completes an untimed level.
    pub can_beat_level: bool,
    pub beat_level_score: i64,
    /// Levels count down from `start_time` seconds.
    pub timed_level: bool,
    pub start_time: f32,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            default_score: 0,
            default_lives: 5,
            can_beat_level: false,
            beat_level_score: 0,
            timed_level: false,
            start_time: 5.0,
        }
    }
}

//=== AudioSettings =======================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Played when the session ends or moves to the next level.
    pub game_over_sfx: Option<ClipId>,
    pub sfx_position: Position,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            game_over_sfx: None,
            sfx_position: (0.0, 0.0, 0.0),
        }
    }
}

//=== KeyBindings =========================================================

/// Keys the session reacts to outside of gameplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: KeyCode,
    pub restart: KeyCode,
    /// Starts the first level from the main menu.
    pub play: KeyCode,
    /// Returns to the main menu.
    pub menu: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: KeyCode::Escape,
            restart: KeyCode::KeyR,
            play: KeyCode::Enter,
            menu: KeyCode::KeyM,
        }
    }
}

//=== SessionSettings =====================================================

/// Complete session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub text: TextSettings,
    pub rules: RuleSettings,
    /// Level order. The first entry is the first level; each level's
    /// successor is the next entry, and the last level has none.
    pub levels: Vec<LevelId>,
    pub audio: AudioSettings,
    /// Player entity, deactivated on game over.
    pub player: Option<EntityId>,
    pub keys: KeyBindings,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            text: TextSettings::default(),
            rules: RuleSettings::default(),
            levels: vec![LevelId::new("Level1")],
            audio: AudioSettings::default(),
            player: None,
            keys: KeyBindings::default(),
        }
    }
}

impl SessionSettings {
    //--- Loading ----------------------------------------------------------

    /// Parses settings from a RON string.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads settings, falling back to defaults with a warning on failure.
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(settings) => (settings, None),
            Err(err) => (Self::default(), Some(format!("{err}; using defaults"))),
        }
    }

    //--- Level Order ------------------------------------------------------

    /// First non-blank level in the configured order.
    pub fn first_level(&self) -> Option<LevelId> {
        self.levels.iter().find(|l| !l.is_empty()).cloned()
    }

    /// Level that follows `level`, or `None` if it is last or unlisted.
    pub fn level_after(&self, level: &LevelId) -> Option<LevelId> {
        let pos = self.levels.iter().position(|l| l == level)?;
        self.levels.get(pos + 1).cloned().and_then(LevelId::non_empty)
    }

    //--- Validation -------------------------------------------------------

    /// Produces non-fatal warnings for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.first_level().is_none() {
            warnings.push("levels: no level configured; play and restart do nothing".into());
        }
        if self.levels.iter().any(LevelId::is_empty) {
            warnings.push("levels: blank level id ends the level sequence early".into());
        }
        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level) {
                warnings.push(format!("levels: duplicate level {level} loops the sequence"));
            }
        }

        if self.rules.timed_level && self.rules.start_time <= 0.0 {
            warnings.push(format!(
                "rules.start_time: {} is not positive; timed levels end on the first tick",
                self.rules.start_time
            ));
        }
        if self.rules.can_beat_level && self.rules.beat_level_score <= self.rules.default_score {
            warnings.push(format!(
                "rules.beat_level_score: {} is reached at the default score {}",
                self.rules.beat_level_score, self.rules.default_score
            ));
        }
        if self.rules.can_beat_level && self.rules.timed_level {
            warnings.push("rules: beat-by-score is ignored on timed levels".into());
        }
        if self.text.game_title.trim().is_empty() {
            warnings.push("text.game_title: empty".into());
        }

        warnings
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn defaults_match_built_in_values() {
        let settings = SessionSettings::default();

        assert_eq!(settings.rules.default_score, 0);
        assert_eq!(settings.rules.default_lives, 5);
        assert!(!settings.rules.can_beat_level);
        assert!(!settings.rules.timed_level);
        assert_eq!(settings.rules.start_time, 5.0);
        assert_eq!(settings.text.game_title, "Gamey Game");
        assert_eq!(settings.text.score_title, "Score: ");
        assert!(settings.text.copyright.starts_with("Copyright "));
        assert_eq!(settings.keys.quit, KeyCode::Escape);
        assert_eq!(settings.keys.restart, KeyCode::KeyR);
    }

    #[test]
    fn partial_ron_keeps_other_defaults() {
        let settings = SessionSettings::from_ron(
            r#"(
                text: (game_title: "Pong Again"),
                rules: (timed_level: true, start_time: 30.0),
                levels: ["Intro", "Boss"],
                player: Some("Player"),
            )"#,
        )
        .expect("parse");

        assert_eq!(settings.text.game_title, "Pong Again");
        assert_eq!(settings.text.lose_message, "Heh you lost");
        assert!(settings.rules.timed_level);
        assert_eq!(settings.rules.start_time, 30.0);
        assert_eq!(settings.rules.default_lives, 5);
        assert_eq!(settings.levels, vec![LevelId::new("Intro"), LevelId::new("Boss")]);
        assert_eq!(settings.player, Some(EntityId::new("Player")));
    }

    #[test]
    fn level_order_defines_successors() {
        let settings = SessionSettings {
            levels: vec!["A".into(), "B".into(), "C".into()],
            ..SessionSettings::default()
        };

        assert_eq!(settings.first_level(), Some(LevelId::new("A")));
        assert_eq!(settings.level_after(&"A".into()), Some(LevelId::new("B")));
        assert_eq!(settings.level_after(&"C".into()), None);
        assert_eq!(settings.level_after(&"Z".into()), None);
    }

    #[test]
    fn blank_successor_means_last_level() {
        let settings = SessionSettings {
            levels: vec!["A".into(), "".into()],
            ..SessionSettings::default()
        };

        assert_eq!(settings.level_after(&"A".into()), None);
    }

    #[test]
    fn default_settings_validate_cleanly() {
        assert!(SessionSettings::default().validate().is_empty());
    }

    #[test]
    fn validate_detects_warnings() {
        let mut settings = SessionSettings::default();
        settings.levels = vec!["A".into(), "A".into(), "".into()];
        settings.rules.timed_level = true;
        settings.rules.start_time = 0.0;
        settings.rules.can_beat_level = true;
        settings.rules.beat_level_score = 0;
        settings.text.game_title = "  ".into();

        let warnings = settings.validate();
        let joined = warnings.join(" | ");
        assert!(joined.contains("duplicate level A"), "{joined}");
        assert!(joined.contains("blank level id"), "{joined}");
        assert!(joined.contains("start_time"), "{joined}");
        assert!(joined.contains("beat_level_score"), "{joined}");
        assert!(joined.contains("ignored on timed levels"), "{joined}");
        assert!(joined.contains("game_title"), "{joined}");
    }

    #[test]
    fn load_from_file_round_trips_written_settings() {
        let file = write_temp(r#"(rules: (default_lives: 3), levels: ["One"])"#);

        let settings = SessionSettings::load_from_file(file.path()).expect("load");

        assert_eq!(settings.rules.default_lives, 3);
        assert_eq!(settings.first_level(), Some(LevelId::new("One")));
    }

    #[test]
    fn load_or_default_missing_file() {
        let (settings, warning) = SessionSettings::load_or_default("definitely/not/here.ron");

        assert_eq!(settings.rules, RuleSettings::default());
        assert!(warning.expect("warning").contains("failed to read"));
    }

    #[test]
    fn load_reports_parse_errors() {
        let file = write_temp("(rules: (default_lives: \"many\"))");

        let err = SessionSettings::load_from_file(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
    }
}
