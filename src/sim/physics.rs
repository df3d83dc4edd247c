//! Gravity integration and AABB collision resolution
//!
//! Bodies are resolved against the level's platforms one platform at a time,
//! separating along the axis of least penetration.

use glam::Vec2;

use super::level::{Level, Platform, PlatformHandle};
use crate::tuning::PhysicsTuning;

/// Axis-aligned bounding box (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Strict intersection: shared edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Anything with a collision rectangle
pub trait Bounds {
    fn bounds(&self) -> Aabb;
}

/// Pure AABB intersection test used for pickups and catches
pub fn check_overlap<A: Bounds + ?Sized, B: Bounds + ?Sized>(a: &A, b: &B) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// A body moved by gravity and pushed out of platforms
#[derive(Debug, Clone)]
pub struct DynamicBody {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
    /// Platform the body last landed on (non-owning)
    pub grounded_platform: Option<PlatformHandle>,
}

impl DynamicBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            grounded: false,
            grounded_platform: None,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// y of the bottom edge
    #[inline]
    pub fn feet(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Clamp horizontal position to the world
    pub fn clamp_to_world(&mut self, world_width: f32) {
        self.pos.x = self.pos.x.clamp(0.0, (world_width - self.size.x).max(0.0));
    }
}

impl Bounds for DynamicBody {
    fn bounds(&self) -> Aabb {
        Aabb {
            min: self.pos,
            size: self.size,
        }
    }
}

/// Side of a platform a body is pushed out through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Penetration depth of a body into a platform, per side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Penetration {
    pub fn between(body: &Aabb, plat: &Aabb) -> Self {
        Self {
            left: body.right() - plat.left(),
            right: plat.right() - body.left(),
            top: body.bottom() - plat.top(),
            bottom: plat.bottom() - body.top(),
        }
    }

    /// Side of minimum penetration; ties keep the first in left, right, top, bottom order
    pub fn min_side(&self) -> (Side, f32) {
        let mut best = (Side::Left, self.left);
        for candidate in [
            (Side::Right, self.right),
            (Side::Top, self.top),
            (Side::Bottom, self.bottom),
        ] {
            if candidate.1 < best.1 {
                best = candidate;
            }
        }
        best
    }
}

/// Integrate gravity into vertical velocity and position
pub fn apply_gravity(body: &mut DynamicBody, physics: &PhysicsTuning, dt: f32) {
    body.vel.y = (body.vel.y + physics.gravity * dt).min(physics.max_fall_speed);
    body.pos.y += body.vel.y * dt;
}

/// Push a body out of one platform along the axis of least penetration
///
/// Returns the side the body was resolved through, or `None` when the bodies
/// don't overlap or the minimal axis is vertical with a velocity that moves
/// away from it (e.g. jumping up while the top overlap is smallest).
pub fn resolve_against(body: &mut DynamicBody, plat: &Platform) -> Option<Side> {
    let plat_box = plat.bounds();
    let body_box = body.bounds();
    if !body_box.overlaps(&plat_box) {
        return None;
    }

    let (side, _) = Penetration::between(&body_box, &plat_box).min_side();
    match side {
        Side::Top if body.vel.y >= 0.0 => {
            body.pos.y = plat_box.top() - body.size.y;
            body.vel.y = 0.0;
            Some(Side::Top)
        }
        Side::Bottom if body.vel.y < 0.0 => {
            body.pos.y = plat_box.bottom();
            body.vel.y = 0.0;
            Some(Side::Bottom)
        }
        Side::Left => {
            body.pos.x = plat_box.left() - body.size.x;
            body.vel.x = 0.0;
            Some(Side::Left)
        }
        Side::Right => {
            body.pos.x = plat_box.right();
            body.vel.x = 0.0;
            Some(Side::Right)
        }
        _ => None,
    }
}

/// Resolve a body against every platform of the level, in order
///
/// Grounded state is recomputed from scratch: it is only set when some
/// platform resolved the body through its top.
pub fn resolve_collisions(body: &mut DynamicBody, level: &Level) {
    body.grounded = false;
    body.grounded_platform = None;

    for (index, plat) in level.platforms.iter().enumerate() {
        if resolve_against(body, plat) == Some(Side::Top) {
            body.grounded = true;
            body.grounded_platform = Some(level.handle(index));
        }
    }
}
