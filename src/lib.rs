//! Metal Chase - simulation core for a side-scrolling chase platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, level generation, pursuit AI, camera, game flow)
//! - `renderer`: Write-only rendering/UI contract and the presenter that feeds it
//! - `platform`: Input provider abstraction
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{PursuitStrategy, Tuning, TuningError};

/// Game configuration constants
///
/// Distances are world pixels with y growing downward. Speeds and durations are
/// expressed per reference frame (60 Hz); the frame clock passes `dt = 1.0` at that rate.
pub mod consts {
    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 4000.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    pub const GROUND_Y: f32 = 540.0;
    pub const GROUND_HEIGHT: f32 = 60.0;
    /// Falling this far below the world bottom loses the run
    pub const PIT_MARGIN: f32 = 100.0;

    /// Gravity (pixels/frame²)
    pub const GRAVITY: f32 = 0.6;
    pub const MAX_FALL_SPEED: f32 = 12.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const JUMP_FORCE: f32 = -13.0;
    pub const TRANSFORM_DURATION: f32 = 90.0; // 1.5s
    pub const ATTACK_DURATION: f32 = 36.0;
    pub const ATTACK_REACH: f32 = 30.0;

    /// Level generation
    pub const PLATFORM_COUNT: usize = 10;
    pub const PLATFORM_MIN_WIDTH: f32 = 80.0;
    pub const PLATFORM_MAX_WIDTH: f32 = 200.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const SAFE_ZONE: f32 = 400.0;
    pub const PLACEMENT_ATTEMPTS: u32 = 20;
    pub const MAX_JUMP_HEIGHT: f32 = 50.0;
    pub const MAX_HORIZONTAL: f32 = 100.0;
    pub const MAX_FALL: f32 = 300.0;
    pub const MIN_PLATFORM_Y: f32 = 60.0;
    pub const FALLBACK_OFFSET: f32 = 20.0;
    pub const FALLBACK_WIDTH: f32 = 120.0;
    /// Occupied sinkable platforms descend this many pixels per frame
    pub const SINK_SPEED: f32 = 0.25;
    pub const START_X: f32 = 100.0;

    /// Collectibles
    pub const COLLECTIBLE_COUNT: usize = 8;
    pub const METAL_WIDTH: f32 = 24.0;
    pub const METAL_HEIGHT: f32 = 24.0;
    pub const BONUS_WIDTH: f32 = 24.0;
    pub const BONUS_HEIGHT: f32 = 24.0;
    pub const BONUS_CLEARANCE: f32 = 8.0;

    /// Pursuer defaults
    pub const POLICEMAN_WIDTH: f32 = 30.0;
    pub const POLICEMAN_HEIGHT: f32 = 50.0;
    pub const POLICEMAN_DELAY: f32 = 120.0; // 2s head start
    pub const POLICEMAN_LOOK_AHEAD: f32 = 150.0;
    pub const MAX_JUMP_DIST: f32 = 100.0;
    pub const EDGE_MARGIN: f32 = 8.0;
    pub const CATCH_DISTANCE: f32 = 30.0;
    pub const SHOCK_DURATION: f32 = 120.0;
    /// Breadcrumb sub-sampling interval (frames per sample)
    pub const TRAIL_INTERVAL: f32 = 2.0;

    /// Camera
    pub const CAMERA_ZOOM: f32 = 1.5;
    pub const CAMERA_LERP: f32 = 0.1;
    pub const CAMERA_OFFSET_X: f32 = 0.35;
    pub const VERTICAL_FOLLOW: f32 = 0.3;

    /// Cutscenes (durations in frames)
    pub const INTRO_OPEN_FRAMES: f32 = 40.0;
    pub const INTRO_HOLD_FRAMES: f32 = 60.0;
    pub const INTRO_REVEAL_FRAMES: f32 = 80.0;
    pub const INTRO_ZOOM: f32 = 3.0;
    pub const INTRO_APERTURE: f32 = 80.0;
    pub const INTRO_LERP: f32 = 0.06;
    pub const ARREST_DURATION: f32 = 150.0;
    pub const ARREST_ZOOM: f32 = 2.5;
    pub const CELEBRATION_DURATION: f32 = 150.0;
    pub const CELEBRATION_ZOOM: f32 = 2.5;
    pub const CUTSCENE_LERP: f32 = 0.05;
    pub const LANDING_TIMEOUT: f32 = 120.0;
}

/// Frame-rate independent smoothing factor
///
/// `rate` is the fraction covered per reference frame. Applying the returned
/// factor once with `dt = 2` covers the same distance as twice with `dt = 1`.
#[inline]
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (1.0 - rate).powf(dt)
}

/// Move `current` toward `target` using [`smoothing_factor`]
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_factor(rate, dt)
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
