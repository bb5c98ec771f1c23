//=========================================================================
// Session Controller
//=========================================================================
//
// Owns the session state and runs the per-frame game-flow tick.
//
// Architecture:
// ```text
//   host loop ──tick(dt, input)──► SessionController
//                                     │  reads  InputSource
//                                     │  writes Presentation (labels, screens, audio)
//                                     └─ asks   SceneLoader (load/unload levels)
// ```
//
// Exactly one controller may be alive per process. Collaborators are
// borrowed per call through `SessionContext`, so the controller itself
// holds no references into the host.
//
//=========================================================================

//=== Module Declarations =================================================

mod guard;
mod phase;
mod state;

//=== Public API ==========================================================

pub use phase::Phase;
pub use state::SessionState;

#[cfg(test)]
pub(crate) use guard::serial as test_serial;

//=== External Dependencies ===============================================

use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::TickControl;
use crate::core::error::SessionError;
use crate::core::input::InputSource;
use crate::core::presentation::{LabelId, Presentation, ScreenId};
use crate::core::scene::{LevelId, SceneLoader};
use crate::core::settings::{RuleSettings, SessionSettings, TextSettings};
use guard::InstanceGuard;
use phase::{Facts, Step};

/// Volume removed from the music channel per tick while fading.
pub const FADE_STEP: f32 = 0.01;

//=== SessionContext ======================================================

/// Collaborators borrowed for one controller call.
pub struct SessionContext<'a> {
    pub presentation: &'a mut dyn Presentation,
    pub scenes: &'a mut dyn SceneLoader,
}

impl<'a> SessionContext<'a> {
    pub fn new(presentation: &'a mut dyn Presentation, scenes: &'a mut dyn SceneLoader) -> Self {
        Self {
            presentation,
            scenes,
        }
    }
}

//=== Outcome =============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Won,
    Lost,
}

//=== SessionController ===================================================

/// Game-flow controller for one play session.
///
/// # Examples
///
/// ```rust
/// use gameflow::prelude::*;
///
/// let mut presentation = HeadlessPresentation::new();
/// let mut scenes = SceneRequestQueue::new();
/// let mut session = SessionController::new(SessionSettings::default()).unwrap();
///
/// let mut ctx = SessionContext::new(&mut presentation, &mut scenes);
/// session.show_main_menu(&mut ctx);
/// session.play(&mut ctx);
/// session.tick(&mut ctx, 1.0 / 60.0, &NO_KEYS);
///
/// assert_eq!(session.phase(), Phase::Playing);
/// assert_eq!(session.state().current_level(), Some(&LevelId::new("Level1")));
/// ```
#[derive(Debug)]
pub struct SessionController {
    settings: SessionSettings,
    state: SessionState,
    _guard: InstanceGuard,
}

impl SessionController {
    //--- Construction -----------------------------------------------------

    /// Creates the process's session controller.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyRunning`] if another controller is alive.
    pub fn new(settings: SessionSettings) -> Result<Self, SessionError> {
        let guard = InstanceGuard::acquire()?;
        let state = SessionState::new(&settings);

        info!(
            target: "session",
            "Session controller created ({} levels, first: {})",
            settings.levels.len(),
            state.first_level().map(LevelId::as_str).unwrap_or("<none>")
        );

        Ok(Self {
            settings,
            state,
            _guard: guard,
        })
    }

    //--- Accessors --------------------------------------------------------

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    //--- Gameplay Hooks ---------------------------------------------------

    pub fn add_score(&mut self, delta: i64) {
        self.state.score = self.state.score.saturating_add(delta);
    }

    pub fn set_score(&mut self, score: i64) {
        self.state.score = score;
    }

    /// Flags the player as dead; consumed by the next tick.
    pub fn mark_player_dead(&mut self) {
        self.state.player_is_dead = true;
    }

    /// Overrides the successor of the current level. A blank id or
    /// `None` makes the current level the last one.
    pub fn set_next_level(&mut self, level: Option<LevelId>) {
        self.state.next_level = level.and_then(LevelId::non_empty);
    }

    //--- Session Operations -----------------------------------------------

    /// Restores counters and every text/rule setting to built-in defaults.
    ///
    /// Level order, audio, player and key bindings are left alone.
    pub fn reset_defaults(&mut self) {
        self.settings.text = TextSettings::default();
        self.settings.rules = RuleSettings::default();
        self.state.score = self.settings.rules.default_score;
        self.state.lives = self.settings.rules.default_lives;
        debug!(target: "session", "Settings reset to built-in defaults");
    }

    /// Returns to the main menu, unloading the current level if any.
    pub fn show_main_menu(&mut self, ctx: &mut SessionContext<'_>) {
        if let Some(level) = self.state.current_level.take() {
            ctx.scenes.unload_async(&level);
        }

        hide_screens(ctx.presentation);

        let state = &mut self.state;
        state.score = self.settings.rules.default_score;
        state.lives = self.settings.rules.default_lives;
        state.phase = Phase::Playing;
        state.player_is_dead = false;
        state.music_faded = false;
        state.remaining_time = None;
        state.next_level = None;
        state.level_to_load = state.first_level.clone();
        self.restore_music(ctx);

        let text = &self.settings.text;
        set_label(ctx.presentation, LabelId::Title, &text.game_title);
        set_label(ctx.presentation, LabelId::Credits, &text.game_credits);
        set_label(ctx.presentation, LabelId::Copyright, &text.copyright);

        show_screen(ctx.presentation, ScreenId::Menu);
        show_screen(ctx.presentation, ScreenId::Footer);

        info!(target: "session", "Main menu");
    }

    /// Asks the host to terminate. Every later tick returns `Exit`.
    pub fn quit(&mut self) -> TickControl {
        if !self.state.quit_requested {
            info!(target: "session", "Quit requested");
        }
        self.state.quit_requested = true;
        TickControl::Exit
    }

    /// Starts the menu's selected level. No-op while a level is active.
    pub fn play(&mut self, ctx: &mut SessionContext<'_>) {
        if self.state.in_level() {
            debug!(target: "session", "Play ignored: a level is already active");
            return;
        }
        match self.state.level_to_load.clone() {
            Some(level) => self.start_level(ctx, level),
            None => warn!(target: "session", "Play ignored: no level configured"),
        }
    }

    /// Shows the HUD and requests an additive load of `level`.
    pub fn start_level(&mut self, ctx: &mut SessionContext<'_>, level: LevelId) {
        hide_screens(ctx.presentation);
        show_screen(ctx.presentation, ScreenId::Hud);

        let rules = &self.settings.rules;
        let text = &self.settings.text;

        if rules.timed_level {
            self.state.remaining_time = Some(rules.start_time);
            set_label(ctx.presentation, LabelId::TimerTitle, &text.timer_title);
            set_label(ctx.presentation, LabelId::TimerValue, &format_time(rules.start_time));
            set_opacity(ctx.presentation, LabelId::TimerTitle, 1.0);
            set_opacity(ctx.presentation, LabelId::TimerValue, 1.0);
        } else {
            self.state.remaining_time = None;
        }

        set_label(ctx.presentation, LabelId::ScoreTitle, &text.score_title);
        set_label(ctx.presentation, LabelId::LivesTitle, &text.lives_title);
        self.refresh_counters(ctx);

        self.state.phase = Phase::Playing;
        self.state.player_is_dead = false;
        self.state.music_faded = false;
        self.restore_music(ctx);

        if let Some(player) = &self.settings.player {
            ctx.presentation.set_entity_active(player, true);
        }

        ctx.scenes.load_additive(&level);
        self.state.next_level = self.settings.level_after(&level);
        info!(
            target: "session",
            "Level {level} started (next: {})",
            self.state.next_level.as_ref().map(LevelId::as_str).unwrap_or("<last>")
        );
        self.state.current_level = Some(level);
    }

    /// Retries the current level.
    pub fn reset_level(&mut self, ctx: &mut SessionContext<'_>) {
        self.state.player_is_dead = false;
        match self.state.current_level.clone() {
            Some(level) => {
                ctx.scenes.unload_async(&level);
                self.start_level(ctx, level);
            }
            None => debug!(target: "session", "Reset ignored: no level active"),
        }
    }

    /// Moves to the next level, or wins the session on the last one.
    pub fn advance_to_next_level(&mut self, ctx: &mut SessionContext<'_>) {
        let Some(next) = self.state.next_level.clone() else {
            self.finish(ctx, Outcome::Won);
            return;
        };

        self.state.music_faded = false;
        self.state.lives = self.settings.rules.default_lives;
        if let Some(current) = self.state.current_level.take() {
            ctx.scenes.unload_async(&current);
        }
        self.start_level(ctx, next);
    }

    /// Resets counters and starts over from the first level.
    pub fn restart_session(&mut self, ctx: &mut SessionContext<'_>) {
        self.state.score = self.settings.rules.default_score;
        self.state.lives = self.settings.rules.default_lives;

        let Some(first) = self.state.first_level.clone() else {
            warn!(target: "session", "Restart ignored: no level configured");
            return;
        };

        info!(target: "session", "Restarting session");
        if let Some(current) = self.state.current_level.take() {
            ctx.scenes.unload_async(&current);
        }
        self.start_level(ctx, first);
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances the session by one frame.
    pub fn tick<I>(&mut self, ctx: &mut SessionContext<'_>, dt: f32, input: &I) -> TickControl
    where
        I: InputSource + ?Sized,
    {
        if self.state.quit_requested {
            return TickControl::Exit;
        }

        //--- Step 1: Keys ---------------------------------------------------
        let keys = self.settings.keys;
        if input.was_pressed(keys.quit) {
            return self.quit();
        }
        if input.was_pressed(keys.restart) {
            self.restart_session(ctx);
        } else if input.was_pressed(keys.menu) && self.state.in_level() {
            self.show_main_menu(ctx);
        } else if input.was_pressed(keys.play) {
            self.play(ctx);
        }

        #[cfg(feature = "debug-keys")]
        self.apply_debug_keys(input);

        if !self.state.in_level() {
            return TickControl::Continue;
        }

        //--- Step 2: Counters ---------------------------------------------
        self.refresh_counters(ctx);

        //--- Step 3: Timer ------------------------------------------------
        self.update_timer(ctx, dt);

        //--- Step 4: Phase machine ----------------------------------------
        self.run_phase(ctx);

        TickControl::Continue
    }

    //--- Internals --------------------------------------------------------

    fn run_phase(&mut self, ctx: &mut SessionContext<'_>) {
        let phase = self.state.phase;
        let music_done = phase.fades_music() && self.fade_music(ctx);
        let rules = &self.settings.rules;

        let facts = Facts {
            player_is_dead: self.state.player_is_dead,
            lives: self.state.lives,
            timed_out: matches!(self.state.remaining_time, Some(t) if t < 0.0),
            beat_by_score: self.state.remaining_time.is_none()
                && rules.can_beat_level
                && self.state.score >= rules.beat_level_score,
            music_done,
            has_next_level: self.state.next_level.is_some(),
        };

        let step = phase.step(&facts);
        trace!(target: "session", "{phase}: {step:?}");

        match step {
            Step::Stay | Step::HoldGameOver => {}

            Step::LoseLife => {
                self.state.lives = self.state.lives.saturating_sub(1);
                info!(target: "session", "Life lost, {} left", self.state.lives);
                self.reset_level(ctx);
            }

            Step::Enter(Phase::GameOver) => {
                info!(target: "session", "Time is up");
                self.finish(ctx, Outcome::Lost);
            }

            Step::Enter(next) => self.enter(next),

            Step::Lose => {
                self.play_end_sound(ctx);
                self.finish(ctx, Outcome::Lost);
            }

            Step::Advance => {
                self.play_end_sound(ctx);
                self.advance_to_next_level(ctx);
            }

            Step::Win => {
                self.play_end_sound(ctx);
                self.finish(ctx, Outcome::Won);
            }
        }

        if self.state.phase.is_terminal() {
            self.hold_game_over(ctx);
        }
    }

    fn enter(&mut self, next: Phase) {
        if self.state.phase != next {
            info!(target: "session", "Phase {} -> {}", self.state.phase, next);
        }
        self.state.phase = next;
    }

    /// Writes the outcome message and moves to GameOver.
    fn finish(&mut self, ctx: &mut SessionContext<'_>, outcome: Outcome) {
        let message = match outcome {
            Outcome::Won => &self.settings.text.win_message,
            Outcome::Lost => &self.settings.text.lose_message,
        };
        set_label(ctx.presentation, LabelId::GameMessage, message);
        self.enter(Phase::GameOver);
    }

    fn hold_game_over(&self, ctx: &mut SessionContext<'_>) {
        if let Some(player) = &self.settings.player {
            ctx.presentation.set_entity_active(player, false);
        }
        hide_screens(ctx.presentation);
        if ctx.presentation.has_screen(ScreenId::EndScreen) {
            ctx.presentation.set_screen_visible(ScreenId::EndScreen, true);
            set_label(ctx.presentation, LabelId::GameOver, &self.settings.text.game_over);
        }
    }

    fn play_end_sound(&self, ctx: &mut SessionContext<'_>) {
        if let Some(clip) = &self.settings.audio.game_over_sfx {
            ctx.presentation.play_one_shot(clip, self.settings.audio.sfx_position);
        }
    }

    /// Steps the music fade. Returns true once silent or absent.
    fn fade_music(&mut self, ctx: &mut SessionContext<'_>) -> bool {
        if self.state.music_faded {
            return true;
        }
        let Some(music) = ctx.presentation.music() else {
            self.state.music_faded = true;
            return true;
        };

        let volume = music.volume();
        if self.state.music_restore.is_none() {
            self.state.music_restore = Some(volume);
        }
        music.set_volume((volume - FADE_STEP).max(0.0));

        if music.is_silent() {
            debug!(target: "session", "Music fade complete");
            self.state.music_faded = true;
        }
        self.state.music_faded
    }

    fn restore_music(&mut self, ctx: &mut SessionContext<'_>) {
        if let Some(volume) = self.state.music_restore.take() {
            if let Some(music) = ctx.presentation.music() {
                music.set_volume(volume);
            }
        }
    }

    fn refresh_counters(&self, ctx: &mut SessionContext<'_>) {
        set_label(ctx.presentation, LabelId::ScoreValue, &self.state.score.to_string());
        set_label(ctx.presentation, LabelId::LivesValue, &self.state.lives.to_string());
    }

    fn update_timer(&mut self, ctx: &mut SessionContext<'_>, dt: f32) {
        match self.state.remaining_time.as_mut() {
            Some(remaining) => {
                *remaining -= dt;
                set_label(ctx.presentation, LabelId::TimerValue, &format_time(*remaining));
            }
            None => {
                set_opacity(ctx.presentation, LabelId::TimerTitle, 0.0);
                set_opacity(ctx.presentation, LabelId::TimerValue, 0.0);
            }
        }
    }

    #[cfg(feature = "debug-keys")]
    fn apply_debug_keys<I>(&mut self, input: &I)
    where
        I: InputSource + ?Sized,
    {
        use crate::core::input::KeyCode;

        const OVERRIDES: [(KeyCode, Phase); 4] = [
            (KeyCode::KeyG, Phase::GameOver),
            (KeyCode::KeyB, Phase::BeatLevel),
            (KeyCode::KeyP, Phase::Playing),
            (KeyCode::KeyD, Phase::Death),
        ];

        for (key, phase) in OVERRIDES {
            if input.was_pressed(key) {
                warn!(target: "session", "Debug override: forcing phase {phase}");
                self.state.phase = phase;
            }
        }
    }
}

//=== Presentation Helpers ================================================

fn set_label(presentation: &mut dyn Presentation, label: LabelId, text: &str) {
    if presentation.has_label(label) {
        presentation.set_text(label, text);
    }
}

fn set_opacity(presentation: &mut dyn Presentation, label: LabelId, opacity: f32) {
    if presentation.has_label(label) {
        presentation.set_opacity(label, opacity);
    }
}

fn show_screen(presentation: &mut dyn Presentation, screen: ScreenId) {
    if presentation.has_screen(screen) {
        presentation.set_screen_visible(screen, true);
    }
}

fn hide_screens(presentation: &mut dyn Presentation) {
    for screen in ScreenId::ALL {
        if presentation.has_screen(screen) {
            presentation.set_screen_visible(screen, false);
        }
    }
}

fn format_time(seconds: f32) -> String {
    format!("{seconds:.2}")
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, NO_KEYS};
    use crate::core::presentation::{ClipId, EntityId, HeadlessPresentation};
    use crate::core::scene::{SceneRequest, SceneRequestQueue};
    use std::sync::MutexGuard;

    // Field order matters: the controller must drop before the lock.
    struct Fixture {
        controller: SessionController,
        presentation: HeadlessPresentation,
        scenes: SceneRequestQueue,
        _serial: MutexGuard<'static, ()>,
    }

    impl Fixture {
        fn new(settings: SessionSettings) -> Self {
            Self::with_presentation(settings, HeadlessPresentation::new())
        }

        fn with_presentation(settings: SessionSettings, presentation: HeadlessPresentation) -> Self {
            let serial = guard::serial();
            let controller = SessionController::new(settings).expect("controller");
            Self {
                controller,
                presentation,
                scenes: SceneRequestQueue::new(),
                _serial: serial,
            }
        }

        fn run<R>(&mut self, f: impl FnOnce(&mut SessionController, &mut SessionContext<'_>) -> R) -> R {
            let mut ctx = SessionContext::new(&mut self.presentation, &mut self.scenes);
            f(&mut self.controller, &mut ctx)
        }

        fn tick(&mut self, dt: f32, keys: &[KeyCode]) -> TickControl {
            self.run(|c, ctx| c.tick(ctx, dt, keys))
        }

        fn started(settings: SessionSettings) -> Self {
            let mut fx = Self::new(settings);
            fx.run(|c, ctx| {
                c.show_main_menu(ctx);
                c.play(ctx);
            });
            fx.scenes.clear();
            fx
        }
    }

    fn levels(ids: &[&str]) -> SessionSettings {
        SessionSettings {
            levels: ids.iter().map(|id| LevelId::new(*id)).collect(),
            ..SessionSettings::default()
        }
    }

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn second_controller_fails_fast() {
        let fx = Fixture::new(SessionSettings::default());

        let second = SessionController::new(SessionSettings::default());

        assert!(matches!(second, Err(SessionError::AlreadyRunning)));
        assert_eq!(fx.controller.lives(), 5);
    }

    #[test]
    fn new_controller_idles_before_menu() {
        let mut fx = Fixture::new(SessionSettings::default());

        assert_eq!(fx.tick(1.0, &NO_KEYS), TickControl::Continue);

        assert!(fx.scenes.is_empty());
        assert!(!fx.controller.state().in_level());
    }

    //=====================================================================
    // Menu / Play
    //=====================================================================

    #[test]
    fn main_menu_shows_menu_and_footer() {
        let mut fx = Fixture::new(SessionSettings::default());

        fx.run(|c, ctx| c.show_main_menu(ctx));

        assert_eq!(fx.presentation.visible_screens(), vec![ScreenId::Menu, ScreenId::Footer]);
        assert_eq!(fx.presentation.text(LabelId::Title), Some("Gamey Game"));
        assert!(fx.presentation.text(LabelId::Copyright).is_some());
    }

    #[test]
    fn play_key_starts_first_level() {
        let mut fx = Fixture::new(levels(&["Intro", "Boss"]));
        fx.run(|c, ctx| c.show_main_menu(ctx));

        fx.tick(0.1, &[KeyCode::Enter]);

        assert_eq!(fx.scenes.take(), vec![SceneRequest::LoadAdditive("Intro".into())]);
        assert_eq!(fx.presentation.visible_screens(), vec![ScreenId::Hud]);
        assert_eq!(fx.controller.state().next_level(), Some(&LevelId::new("Boss")));
    }

    #[test]
    fn menu_key_unloads_current_level() {
        let mut fx = Fixture::started(levels(&["Intro"]));

        fx.tick(0.1, &[KeyCode::KeyM]);

        assert_eq!(fx.scenes.take(), vec![SceneRequest::Unload("Intro".into())]);
        assert!(!fx.controller.state().in_level());
        assert!(fx.presentation.is_screen_visible(ScreenId::Menu));
    }

    #[test]
    fn quit_key_exits_and_stays_exited() {
        let mut fx = Fixture::started(SessionSettings::default());

        assert_eq!(fx.tick(0.1, &[KeyCode::Escape]), TickControl::Exit);
        assert!(fx.controller.state().quit_requested());
        assert_eq!(fx.tick(0.1, &NO_KEYS), TickControl::Exit);
    }

    //=====================================================================
    // Start Level
    //=====================================================================

    #[test]
    fn start_level_initializes_hud() {
        let mut settings = SessionSettings::default();
        settings.rules.timed_level = true;
        settings.player = Some(EntityId::new("Player"));
        let mut fx = Fixture::started(settings);

        assert_eq!(fx.presentation.text(LabelId::TimerValue), Some("5.00"));
        assert_eq!(fx.presentation.text(LabelId::TimerTitle), Some("Timer: "));
        assert_eq!(fx.presentation.text(LabelId::ScoreValue), Some("0"));
        assert_eq!(fx.presentation.text(LabelId::LivesValue), Some("5"));
        assert_eq!(fx.presentation.is_entity_active(&EntityId::new("Player")), Some(true));

        fx.tick(0.25, &NO_KEYS);
        assert_eq!(fx.presentation.text(LabelId::TimerValue), Some("4.75"));
    }

    #[test]
    fn untimed_level_hides_timer_labels() {
        let mut fx = Fixture::started(SessionSettings::default());

        fx.tick(0.1, &NO_KEYS);

        assert_eq!(fx.presentation.opacity(LabelId::TimerTitle), 0.0);
        assert_eq!(fx.presentation.opacity(LabelId::TimerValue), 0.0);
        assert_eq!(fx.controller.state().remaining_time(), None);
    }

    #[test]
    fn missing_labels_are_skipped() {
        let presentation = HeadlessPresentation::new()
            .without_label(LabelId::ScoreValue)
            .without_screen(ScreenId::Footer);
        let mut fx = Fixture::with_presentation(SessionSettings::default(), presentation);

        fx.run(|c, ctx| {
            c.show_main_menu(ctx);
            c.play(ctx);
        });
        fx.tick(0.1, &NO_KEYS);

        assert_eq!(fx.presentation.text(LabelId::ScoreValue), None);
        assert!(!fx.presentation.is_screen_visible(ScreenId::Footer));
    }

    //=====================================================================
    // Phase Machine
    //=====================================================================

    #[test]
    fn death_with_lives_retries_level() {
        let mut fx = Fixture::started(levels(&["Intro"]));

        fx.controller.mark_player_dead();
        fx.tick(0.1, &NO_KEYS);

        assert_eq!(fx.controller.lives(), 4);
        assert_eq!(fx.controller.phase(), Phase::Playing);
        assert!(!fx.controller.state().player_is_dead());
        assert_eq!(
            fx.scenes.take(),
            vec![
                SceneRequest::Unload("Intro".into()),
                SceneRequest::LoadAdditive("Intro".into()),
            ]
        );
    }

    #[test]
    fn death_without_music_ends_next_tick() {
        let mut settings = SessionSettings::default();
        settings.rules.default_lives = 0;
        settings.audio.game_over_sfx = Some(ClipId::new("gameover"));
        let mut fx = Fixture::started(settings);

        fx.controller.mark_player_dead();
        fx.tick(0.1, &NO_KEYS);
        assert_eq!(fx.controller.phase(), Phase::Death);

        fx.tick(0.1, &NO_KEYS);
        assert_eq!(fx.controller.phase(), Phase::GameOver);
        assert_eq!(fx.presentation.text(LabelId::GameMessage), Some("Heh you lost"));
        assert_eq!(fx.presentation.played_clips(), &[ClipId::new("gameover")]);
        assert_eq!(fx.presentation.visible_screens(), vec![ScreenId::EndScreen]);
        assert_eq!(fx.presentation.text(LabelId::GameOver), Some("Game Over"));
    }

    #[test]
    fn death_fades_music_before_game_over() {
        let mut settings = SessionSettings::default();
        settings.rules.default_lives = 0;
        let mut fx = Fixture::with_presentation(settings, HeadlessPresentation::new().with_music(0.05));
        fx.run(|c, ctx| {
            c.show_main_menu(ctx);
            c.play(ctx);
        });

        fx.controller.mark_player_dead();
        fx.tick(0.1, &NO_KEYS);

        let mut ticks = 0;
        while fx.controller.phase() == Phase::Death && ticks < 100 {
            fx.tick(0.1, &NO_KEYS);
            ticks += 1;
        }

        assert_eq!(fx.controller.phase(), Phase::GameOver);
        assert!(ticks > 1, "fade should take several ticks");
        assert_eq!(fx.presentation.music_volume(), Some(0.0));
    }

    #[test]
    fn music_volume_is_restored_on_restart() {
        let mut settings = SessionSettings::default();
        settings.rules.default_lives = 0;
        let mut fx = Fixture::with_presentation(settings, HeadlessPresentation::new().with_music(0.5));
        fx.run(|c, ctx| {
            c.show_main_menu(ctx);
            c.play(ctx);
        });
        fx.controller.mark_player_dead();
        fx.tick(0.1, &NO_KEYS);
        fx.tick(0.1, &NO_KEYS);
        assert!(fx.presentation.music_volume().unwrap_or(1.0) < 0.5);

        fx.tick(0.1, &[KeyCode::KeyR]);

        assert_eq!(fx.presentation.music_volume(), Some(0.5));
        assert_eq!(fx.controller.phase(), Phase::Playing);
    }

    #[test]
    fn beat_level_advances_to_next_level() {
        let mut settings = levels(&["One", "Two"]);
        settings.rules.can_beat_level = true;
        settings.rules.beat_level_score = 10;
        settings.rules.default_lives = 3;
        let mut fx = Fixture::started(settings);

        fx.controller.mark_player_dead();
        fx.tick(0.1, &NO_KEYS);
        assert_eq!(fx.controller.lives(), 2);
        fx.scenes.clear();

        fx.controller.add_score(10);
        fx.tick(0.1, &NO_KEYS);
        assert_eq!(fx.controller.phase(), Phase::BeatLevel);

        fx.tick(0.1, &NO_KEYS);
        assert_eq!(fx.controller.phase(), Phase::Playing);
        assert_eq!(fx.controller.lives(), 3);
        assert_eq!(
            fx.scenes.take(),
            vec![SceneRequest::Unload("One".into()), SceneRequest::LoadAdditive("Two".into())]
        );
        assert_eq!(fx.controller.state().next_level(), None);
    }

    #[test]
    fn beat_last_level_wins() {
        let mut settings = levels(&["Only"]);
        settings.rules.can_beat_level = true;
        settings.rules.beat_level_score = 1;
        let mut fx = Fixture::started(settings);

        fx.controller.set_score(1);
        fx.tick(0.1, &NO_KEYS);
        fx.tick(0.1, &NO_KEYS);

        assert_eq!(fx.controller.phase(), Phase::GameOver);
        assert_eq!(fx.presentation.text(LabelId::GameMessage), Some("I guess you won, congrats."));
        assert!(fx.scenes.is_empty());
    }

    #[test]
    fn game_over_keeps_player_disabled() {
        let mut settings = SessionSettings::default();
        settings.rules.timed_level = true;
        settings.rules.start_time = 0.5;
        settings.player = Some(EntityId::new("Player"));
        let mut fx = Fixture::started(settings);

        fx.tick(1.0, &NO_KEYS);
        assert_eq!(fx.controller.phase(), Phase::GameOver);

        fx.controller.mark_player_dead();
        fx.controller.add_score(100);
        fx.tick(1.0, &NO_KEYS);

        assert_eq!(fx.controller.phase(), Phase::GameOver);
        assert_eq!(fx.presentation.is_entity_active(&EntityId::new("Player")), Some(false));
    }

    #[test]
    fn set_next_level_overrides_order() {
        let mut fx = Fixture::started(levels(&["One", "Two"]));

        fx.controller.set_next_level(Some(LevelId::new("")));
        assert_eq!(fx.controller.state().next_level(), None);

        fx.controller.set_next_level(Some(LevelId::new("Secret")));
        fx.run(|c, ctx| c.advance_to_next_level(ctx));

        assert_eq!(fx.controller.state().current_level(), Some(&LevelId::new("Secret")));
    }

    //=====================================================================
    // Defaults
    //=====================================================================

    #[test]
    fn reset_defaults_restores_built_in_values() {
        let mut settings = SessionSettings::default();
        settings.text.game_title = "Custom".into();
        settings.rules.default_lives = 9;
        let mut fx = Fixture::new(settings);
        fx.controller.set_score(42);

        fx.controller.reset_defaults();

        assert_eq!(fx.controller.score(), 0);
        assert_eq!(fx.controller.lives(), 5);
        assert_eq!(fx.controller.settings().text.game_title, "Gamey Game");
    }

    #[cfg(feature = "debug-keys")]
    #[test]
    fn debug_keys_force_phase() {
        let mut fx = Fixture::started(SessionSettings::default());

        fx.tick(0.1, &[KeyCode::KeyB]);
        assert_ne!(fx.controller.phase(), Phase::Playing);

        fx.tick(0.1, &[KeyCode::KeyG]);
        assert_eq!(fx.controller.phase(), Phase::GameOver);
    }
}
