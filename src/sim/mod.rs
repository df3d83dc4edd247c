//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - `dt`-scaled integration and smoothing only
//! - Seeded RNG only
//! - Stable iteration order (platform list order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod camera;
pub mod level;
pub mod physics;
pub mod player;
pub mod pursuit;
pub mod state;
pub mod tick;
pub mod trail;

pub use animation::{Animator, Clip, ClipLibrary};
pub use camera::Camera;
pub use level::{BonusObject, Collectible, Level, Platform, PlatformHandle, generate_level};
pub use physics::{Aabb, Bounds, DynamicBody, apply_gravity, check_overlap, resolve_collisions};
pub use player::{Form, Player, PlayerAnim};
pub use pursuit::{Pursuer, PursuerAnim, Strategy, should_jump};
pub use state::{EndReason, GameContext, GameEvent, GameMode, IntroPhase};
pub use tick::{TickInput, tick};
pub use trail::{Trail, TrailFollower, TrailSample};
