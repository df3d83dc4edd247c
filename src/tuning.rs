//! Game balance and tuning
//!
//! Every field defaults to the matching constant in [`crate::consts`], so a
//! tuning file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating tuning
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Which pursuit design drives the policeman
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PursuitStrategy {
    /// Physics-driven chase with jump planning
    #[default]
    Heuristic,
    /// Replays the player's breadcrumb trail
    Trail,
}

impl PursuitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PursuitStrategy::Heuristic => "heuristic",
            PursuitStrategy::Trail => "trail",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "heuristic" | "live" => Some(PursuitStrategy::Heuristic),
            "trail" | "breadcrumb" => Some(PursuitStrategy::Trail),
            _ => None,
        }
    }
}

/// Screen and world geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub screen_width: f32,
    pub screen_height: f32,
    pub width: f32,
    pub height: f32,
    /// Top of the ground platform
    pub ground_y: f32,
    pub ground_height: f32,
    pub pit_margin: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            ground_y: GROUND_Y,
            ground_height: GROUND_HEIGHT,
            pit_margin: PIT_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    pub gravity: f32,
    pub max_fall_speed: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_fall_speed: MAX_FALL_SPEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Initial vertical velocity of a jump (negative is up)
    pub jump_force: f32,
    pub transform_duration: f32,
    pub attack_duration: f32,
    /// Horizontal length of the robot's strike box
    pub attack_reach: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: PLAYER_SPEED,
            jump_force: JUMP_FORCE,
            transform_duration: TRANSFORM_DURATION,
            attack_duration: ATTACK_DURATION,
            attack_reach: ATTACK_REACH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub platform_count: usize,
    pub min_width: f32,
    pub max_width: f32,
    pub platform_height: f32,
    /// Platform-free span at the left edge of the world
    pub safe_zone: f32,
    pub placement_attempts: u32,
    pub max_jump_height: f32,
    pub max_horizontal: f32,
    pub max_fall: f32,
    pub min_platform_y: f32,
    pub fallback_offset: f32,
    pub fallback_width: f32,
    pub sink_speed: f32,
    pub start_x: f32,
    pub collectible_count: usize,
    pub collectible_width: f32,
    pub collectible_height: f32,
    /// Place the bonus object on the last selected platform
    pub bonus: bool,
    pub bonus_width: f32,
    pub bonus_height: f32,
    pub bonus_clearance: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            platform_count: PLATFORM_COUNT,
            min_width: PLATFORM_MIN_WIDTH,
            max_width: PLATFORM_MAX_WIDTH,
            platform_height: PLATFORM_HEIGHT,
            safe_zone: SAFE_ZONE,
            placement_attempts: PLACEMENT_ATTEMPTS,
            max_jump_height: MAX_JUMP_HEIGHT,
            max_horizontal: MAX_HORIZONTAL,
            max_fall: MAX_FALL,
            min_platform_y: MIN_PLATFORM_Y,
            fallback_offset: FALLBACK_OFFSET,
            fallback_width: FALLBACK_WIDTH,
            sink_speed: SINK_SPEED,
            start_x: START_X,
            collectible_count: COLLECTIBLE_COUNT,
            collectible_width: METAL_WIDTH,
            collectible_height: METAL_HEIGHT,
            bonus: true,
            bonus_width: BONUS_WIDTH,
            bonus_height: BONUS_HEIGHT,
            bonus_clearance: BONUS_CLEARANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitTuning {
    pub strategy: PursuitStrategy,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    /// Frames between arming and appearing
    pub activation_delay: f32,
    pub look_ahead: f32,
    pub max_jump_dist: f32,
    pub max_jump_height: f32,
    pub edge_margin: f32,
    pub catch_distance: f32,
    pub shock_duration: f32,
    pub trail_interval: f32,
}

impl Default for PursuitTuning {
    fn default() -> Self {
        Self {
            strategy: PursuitStrategy::Heuristic,
            width: POLICEMAN_WIDTH,
            height: POLICEMAN_HEIGHT,
            speed: PLAYER_SPEED,
            activation_delay: POLICEMAN_DELAY,
            look_ahead: POLICEMAN_LOOK_AHEAD,
            max_jump_dist: MAX_JUMP_DIST,
            max_jump_height: MAX_JUMP_HEIGHT,
            edge_margin: EDGE_MARGIN,
            catch_distance: CATCH_DISTANCE,
            shock_duration: SHOCK_DURATION,
            trail_interval: TRAIL_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub zoom: f32,
    pub lerp: f32,
    /// Horizontal position of the player within the view (0 = left edge)
    pub offset_x: f32,
    /// Fraction of vertical deviation from the ground baseline that is followed
    pub vertical_follow: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            zoom: CAMERA_ZOOM,
            lerp: CAMERA_LERP,
            offset_x: CAMERA_OFFSET_X,
            vertical_follow: VERTICAL_FOLLOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutsceneTuning {
    pub intro_open: f32,
    pub intro_hold: f32,
    pub intro_reveal: f32,
    pub intro_zoom: f32,
    pub intro_aperture: f32,
    pub intro_lerp: f32,
    pub arrest_duration: f32,
    pub arrest_zoom: f32,
    pub celebration_duration: f32,
    pub celebration_zoom: f32,
    pub cutscene_lerp: f32,
    /// Frames to wait for airborne actors before a cutscene starts anyway
    pub landing_timeout: f32,
}

impl Default for CutsceneTuning {
    fn default() -> Self {
        Self {
            intro_open: INTRO_OPEN_FRAMES,
            intro_hold: INTRO_HOLD_FRAMES,
            intro_reveal: INTRO_REVEAL_FRAMES,
            intro_zoom: INTRO_ZOOM,
            intro_aperture: INTRO_APERTURE,
            intro_lerp: INTRO_LERP,
            arrest_duration: ARREST_DURATION,
            arrest_zoom: ARREST_ZOOM,
            celebration_duration: CELEBRATION_DURATION,
            celebration_zoom: CELEBRATION_ZOOM,
            cutscene_lerp: CUTSCENE_LERP,
            landing_timeout: LANDING_TIMEOUT,
        }
    }
}

/// Complete tuning set
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldTuning,
    pub physics: PhysicsTuning,
    pub player: PlayerTuning,
    pub level: LevelTuning,
    pub pursuit: PursuitTuning,
    pub camera: CameraTuning,
    pub cutscene: CutsceneTuning,
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break generation or the camera bounds
    pub fn validate(&self) -> Result<(), TuningError> {
        // JSON numbers beyond f32 range deserialize to infinity
        for (field, value) in self.float_fields() {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }

        let positive = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("world.screen_width", self.world.screen_width),
            ("world.screen_height", self.world.screen_height),
            ("player.width", self.player.width),
            ("player.height", self.player.height),
            ("pursuit.width", self.pursuit.width),
            ("pursuit.height", self.pursuit.height),
            ("level.platform_height", self.level.platform_height),
            ("level.min_width", self.level.min_width),
            ("level.fallback_width", self.level.fallback_width),
            ("pursuit.trail_interval", self.pursuit.trail_interval),
            ("camera.zoom", self.camera.zoom),
            ("cutscene.intro_open", self.cutscene.intro_open),
            ("cutscene.intro_reveal", self.cutscene.intro_reveal),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let rates = [
            ("camera.lerp", self.camera.lerp),
            ("cutscene.intro_lerp", self.cutscene.intro_lerp),
            ("cutscene.cutscene_lerp", self.cutscene.cutscene_lerp),
        ];
        for (field, value) in rates {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(field, format!("must be in (0, 1], got {value}")));
            }
        }

        if self.level.min_width > self.level.max_width {
            return Err(invalid(
                "level.min_width",
                format!(
                    "{} exceeds level.max_width {}",
                    self.level.min_width, self.level.max_width
                ),
            ));
        }
        if self.level.safe_zone >= self.world.width {
            return Err(invalid("level.safe_zone", "leaves no room for platforms".into()));
        }
        if self.world.ground_y >= self.world.height || self.world.ground_y <= 0.0 {
            return Err(invalid("world.ground_y", "must lie inside the world".into()));
        }
        // The fallback platform must stay reachable from the ground
        if 2.0 * self.level.platform_height > self.level.max_jump_height {
            return Err(invalid(
                "level.platform_height",
                "fallback platforms would be out of jump reach".into(),
            ));
        }
        // Camera must never show area outside the world
        let min_zoom = (self.world.screen_width / self.world.width)
            .max(self.world.screen_height / self.world.height);
        for (field, zoom) in [
            ("camera.zoom", self.camera.zoom),
            ("cutscene.intro_zoom", self.cutscene.intro_zoom),
            ("cutscene.arrest_zoom", self.cutscene.arrest_zoom),
            ("cutscene.celebration_zoom", self.cutscene.celebration_zoom),
        ] {
            if zoom < min_zoom {
                return Err(invalid(field, format!("must be at least {min_zoom}")));
            }
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 60] {
        let (w, ph, p, l, pu, c, cs) = (
            &self.world,
            &self.physics,
            &self.player,
            &self.level,
            &self.pursuit,
            &self.camera,
            &self.cutscene,
        );
        [
            ("world.screen_width", w.screen_width),
            ("world.screen_height", w.screen_height),
            ("world.width", w.width),
            ("world.height", w.height),
            ("world.ground_y", w.ground_y),
            ("world.ground_height", w.ground_height),
            ("world.pit_margin", w.pit_margin),
            ("physics.gravity", ph.gravity),
            ("physics.max_fall_speed", ph.max_fall_speed),
            ("player.width", p.width),
            ("player.height", p.height),
            ("player.speed", p.speed),
            ("player.jump_force", p.jump_force),
            ("player.transform_duration", p.transform_duration),
            ("player.attack_duration", p.attack_duration),
            ("player.attack_reach", p.attack_reach),
            ("level.min_width", l.min_width),
            ("level.max_width", l.max_width),
            ("level.platform_height", l.platform_height),
            ("level.safe_zone", l.safe_zone),
            ("level.max_jump_height", l.max_jump_height),
            ("level.max_horizontal", l.max_horizontal),
            ("level.max_fall", l.max_fall),
            ("level.min_platform_y", l.min_platform_y),
            ("level.fallback_offset", l.fallback_offset),
            ("level.fallback_width", l.fallback_width),
            ("level.sink_speed", l.sink_speed),
            ("level.start_x", l.start_x),
            ("level.collectible_width", l.collectible_width),
            ("level.collectible_height", l.collectible_height),
            ("level.bonus_width", l.bonus_width),
            ("level.bonus_height", l.bonus_height),
            ("level.bonus_clearance", l.bonus_clearance),
            ("pursuit.width", pu.width),
            ("pursuit.height", pu.height),
            ("pursuit.speed", pu.speed),
            ("pursuit.activation_delay", pu.activation_delay),
            ("pursuit.look_ahead", pu.look_ahead),
            ("pursuit.max_jump_dist", pu.max_jump_dist),
            ("pursuit.max_jump_height", pu.max_jump_height),
            ("pursuit.edge_margin", pu.edge_margin),
            ("pursuit.catch_distance", pu.catch_distance),
            ("pursuit.shock_duration", pu.shock_duration),
            ("pursuit.trail_interval", pu.trail_interval),
            ("camera.zoom", c.zoom),
            ("camera.lerp", c.lerp),
            ("camera.offset_x", c.offset_x),
            ("camera.vertical_follow", c.vertical_follow),
            ("cutscene.intro_open", cs.intro_open),
            ("cutscene.intro_hold", cs.intro_hold),
            ("cutscene.intro_reveal", cs.intro_reveal),
            ("cutscene.intro_zoom", cs.intro_zoom),
            ("cutscene.intro_aperture", cs.intro_aperture),
            ("cutscene.intro_lerp", cs.intro_lerp),
            ("cutscene.arrest_duration", cs.arrest_duration),
            ("cutscene.arrest_zoom", cs.arrest_zoom),
            ("cutscene.celebration_duration", cs.celebration_duration),
            ("cutscene.celebration_zoom", cs.celebration_zoom),
            ("cutscene.cutscene_lerp", cs.cutscene_lerp),
            ("cutscene.landing_timeout", cs.landing_timeout),
        ]
    }
}

fn invalid(field: &'static str, reason: String) -> TuningError {
    TuningError::Invalid { field, reason }
}
