//! Game state definitions
//!
//! [`GameContext`] holds everything one game session owns: tuning, the seeded
//! RNG, the current level and its actors, the camera and the mode machine.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{Animator, ClipLibrary};
use super::camera::Camera;
use super::level::{Level, generate_level};
use super::player::{Form, Player};
use super::pursuit::Pursuer;
use crate::tuning::Tuning;

/// Top-level game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen, waiting for start
    Menu,
    /// Non-interactive reveal before play
    Intro,
    Playing,
    /// Capture cutscene
    Arrest,
    /// Victory cutscene
    Celebration,
    Win,
    Lose,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Menu => "menu",
            GameMode::Intro => "intro",
            GameMode::Playing => "playing",
            GameMode::Arrest => "arrest",
            GameMode::Celebration => "celebration",
            GameMode::Win => "win",
            GameMode::Lose => "lose",
        }
    }

    /// Player control and physics are suspended
    pub fn is_cutscene(&self) -> bool {
        matches!(self, GameMode::Arrest | GameMode::Celebration)
    }
}

/// Intro sub-phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroPhase {
    /// Aperture grows to its small radius
    Opening,
    Holding,
    /// Aperture opens fully while the camera zooms out
    Revealing,
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    AllCollected,
    Caught,
    Fell,
}

impl EndReason {
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::AllCollected => "ALL METAL COLLECTED!",
            EndReason::Caught => "CAUGHT BY THE POLICE!",
            EndReason::Fell => "YOU FELL!",
        }
    }
}

/// Notification for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ModeChanged { from: GameMode, to: GameMode },
    LevelStarted { generation: u32, total: usize },
    CollectiblePicked { index: usize, collected: usize, total: usize },
    BonusTriggered { pos: Vec2 },
    /// The bonus splash played out; the prop is gone
    BonusSplashFinished,
    /// Armed by the player's first input
    PursuerActivated,
    /// Appeared after the activation delay
    PursuerRevealed,
    PursuerShocked,
    PlayerTransformed { form: Form },
    CaptureStarted,
    CelebrationStarted,
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct GameContext {
    pub tuning: Tuning,
    pub clips: ClipLibrary,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub mode: GameMode,
    /// Frames spent in the current mode (or intro phase)
    pub mode_timer: f32,
    pub intro_phase: IntroPhase,
    /// Intro reveal radius in screen pixels; `None` when fully open
    pub aperture: Option<f32>,
    /// Frames since the cutscene poses started; `None` while waiting for landing
    pub cutscene_timer: Option<f32>,
    pub end_reason: Option<EndReason>,
    pub level: Level,
    pub player: Player,
    pub pursuer: Pursuer,
    pub camera: Camera,
    /// Simulation tick counter
    pub frame: u64,
    pub controls_visible: bool,
    /// Splash playing after the bonus was triggered
    pub bonus_splash: Option<Animator>,
    events: Vec<GameEvent>,
    next_generation: u32,
}

impl GameContext {
    /// Create a session on the menu screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(Vec2::ZERO, &tuning);
        let pursuer = Pursuer::new(Vec2::ZERO, &tuning);
        let camera = Camera::new(&tuning);
        Self {
            clips: ClipLibrary::standard(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Menu,
            mode_timer: 0.0,
            intro_phase: IntroPhase::Opening,
            aperture: None,
            cutscene_timer: None,
            end_reason: None,
            level: Level::empty(),
            player,
            pursuer,
            camera,
            frame: 0,
            controls_visible: false,
            bonus_splash: None,
            events: Vec::new(),
            next_generation: 1,
            tuning,
        }
    }

    /// Generate a fresh level and reset the actors and camera onto it
    pub fn start_level(&mut self) {
        let generation = self.next_generation;
        self.next_generation += 1;

        self.level = generate_level(&self.tuning, generation, &mut self.rng);
        let start = self.level.start_position;
        self.player = Player::new(start, &self.tuning);
        self.pursuer = Pursuer::new(start, &self.tuning);
        self.camera = Camera::new(&self.tuning);
        self.camera.snap_to(start, &self.tuning);
        self.aperture = None;
        self.cutscene_timer = None;
        self.end_reason = None;
        self.bonus_splash = None;

        self.events.push(GameEvent::LevelStarted {
            generation,
            total: self.level.total_collectibles(),
        });
    }

    /// Enter `mode`, resetting its timers
    pub fn set_mode(&mut self, mode: GameMode) {
        if self.mode == mode {
            return;
        }
        log::info!("Mode {} -> {}", self.mode.as_str(), mode.as_str());
        self.events.push(GameEvent::ModeChanged {
            from: self.mode,
            to: mode,
        });
        self.mode = mode;
        self.mode_timer = 0.0;
        self.cutscene_timer = None;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Midpoint between the player and pursuer centres
    pub fn actors_midpoint(&self) -> Vec2 {
        (self.player.body.center() + self.pursuer.body.center()) * 0.5
    }
}
