//! Policeman pursuit AI
//!
//! The canonical pursuer runs at the player with the same physics as the
//! player and plans jumps from a short lookahead over the platform list. The
//! trail strategy replays the player's breadcrumbs instead.

use glam::Vec2;

use super::animation::Animator;
use super::level::{Level, Platform};
use super::physics::{DynamicBody, apply_gravity, resolve_collisions};
use super::trail::{Motion, TrailFollower, TrailSample};
use crate::tuning::{PursuitStrategy, Tuning};

/// Pursuer animation states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PursuerAnim {
    Running,
    Jumping,
    Arrest,
    Shock,
}

impl PursuerAnim {
    pub fn clip(self) -> &'static str {
        match self {
            PursuerAnim::Running => "police_running",
            PursuerAnim::Jumping => "police_jumping",
            PursuerAnim::Arrest => "police_arrest",
            PursuerAnim::Shock => "police_shock",
        }
    }
}

/// How the pursuer decides where to go
#[derive(Debug, Clone)]
pub enum Strategy {
    Heuristic,
    Trail(TrailFollower),
}

#[derive(Debug, Clone)]
pub struct Pursuer {
    pub body: DynamicBody,
    /// Armed by the player's first input
    pub activated: bool,
    pub activation_timer: f32,
    /// Visible and chasing
    pub active: bool,
    pub anim: PursuerAnim,
    pub animator: Animator,
    pub facing_right: bool,
    pub strategy: Strategy,
    shock_timer: Option<f32>,
}

impl Pursuer {
    pub fn new(start: Vec2, tuning: &Tuning) -> Self {
        let params = &tuning.pursuit;
        let strategy = match params.strategy {
            PursuitStrategy::Heuristic => Strategy::Heuristic,
            PursuitStrategy::Trail => Strategy::Trail(TrailFollower::new(params.trail_interval)),
        };
        Self {
            body: DynamicBody::new(start, Vec2::new(params.width, params.height)),
            activated: false,
            activation_timer: 0.0,
            active: false,
            anim: PursuerAnim::Running,
            animator: Animator::new(PursuerAnim::Running.clip()),
            facing_right: true,
            strategy,
            shock_timer: None,
        }
    }

    /// Arm the pursuer; it appears after the activation delay
    pub fn activate(&mut self) {
        if self.activated {
            return;
        }
        self.activated = true;
        self.activation_timer = 0.0;
        log::debug!("Pursuer armed");
    }

    pub fn is_shocked(&self) -> bool {
        self.shock_timer.is_some()
    }

    /// Active and not stunned
    pub fn can_catch(&self) -> bool {
        self.active && !self.is_shocked()
    }

    /// Feed the breadcrumb trail (no-op for the heuristic strategy)
    pub fn record_target(&mut self, target: &DynamicBody, facing_right: bool, dt: f32) {
        if let Strategy::Trail(follower) = &mut self.strategy {
            follower.trail.record(
                TrailSample {
                    pos: target.pos,
                    motion: Motion::of(target),
                    facing_right,
                },
                dt,
            );
        }
    }

    /// Advance one frame of chasing. Returns true on the frame the pursuer appears.
    pub fn update(&mut self, level: &Level, target: &DynamicBody, tuning: &Tuning, dt: f32) -> bool {
        if let Some(timer) = self.shock_timer.as_mut() {
            *timer += dt;
            if *timer < tuning.pursuit.shock_duration {
                self.body.vel.x = 0.0;
                apply_gravity(&mut self.body, &tuning.physics, dt);
                resolve_collisions(&mut self.body, level);
                return false;
            }
            self.shock_timer = None;
            self.set_anim(PursuerAnim::Running);
            log::debug!("Pursuer recovered from shock");
        }

        if !self.activated {
            return false;
        }
        let mut appeared = false;
        if !self.active {
            self.activation_timer += dt;
            if self.activation_timer < tuning.pursuit.activation_delay {
                return false;
            }
            self.active = true;
            appeared = true;
            log::debug!("Pursuer joined the chase");
        }

        match &mut self.strategy {
            Strategy::Heuristic => self.chase(level, target, tuning, dt),
            Strategy::Trail(follower) => {
                if let Some(pose) = follower.advance(dt) {
                    if dt > 0.0 {
                        self.body.vel = (pose.pos - self.body.pos) / dt;
                    }
                    self.body.pos = pose.pos;
                    self.body.grounded = pose.motion != Motion::Airborne;
                    self.facing_right = pose.facing_right;
                }
                let anim = if self.body.grounded {
                    PursuerAnim::Running
                } else {
                    PursuerAnim::Jumping
                };
                self.set_anim(anim);
            }
        }
        appeared
    }

    /// Physics-driven chase step
    fn chase(&mut self, level: &Level, target: &DynamicBody, tuning: &Tuning, dt: f32) {
        let dir = if target.pos.x > self.body.pos.x { 1.0 } else { -1.0 };
        self.body.vel.x = tuning.pursuit.speed * dir;

        if self.body.grounded && should_jump(&self.body, level, target, dir, tuning) {
            self.body.vel.y = tuning.player.jump_force;
            self.body.grounded = false;
            log::debug!("Pursuer jumps at x={:.0}", self.body.pos.x);
        }

        apply_gravity(&mut self.body, &tuning.physics, dt);
        self.body.pos.x += self.body.vel.x * dt;
        self.body.clamp_to_world(tuning.world.width);
        resolve_collisions(&mut self.body, level);

        if self.body.vel.x > 0.0 {
            self.facing_right = true;
        } else if self.body.vel.x < 0.0 {
            self.facing_right = false;
        }

        let anim = if self.body.grounded {
            PursuerAnim::Running
        } else {
            PursuerAnim::Jumping
        };
        self.set_anim(anim);
    }

    fn set_anim(&mut self, anim: PursuerAnim) {
        self.anim = anim;
        self.animator.set_state(anim.clip(), true);
    }

    /// Distance between centres
    pub fn distance_to(&self, target: &DynamicBody) -> f32 {
        self.body.center().distance(target.center())
    }

    pub fn halt_horizontal(&mut self) {
        self.body.vel.x = 0.0;
    }

    /// Lock into the one-shot arrest sequence
    pub fn play_arrest(&mut self) {
        self.shock_timer = None;
        self.anim = PursuerAnim::Arrest;
        self.animator.play(PursuerAnim::Arrest.clip(), false);
    }

    /// Lock into the one-shot shock sequence and stop chasing for a while
    pub fn play_shock(&mut self) {
        self.shock_timer = Some(0.0);
        self.body.vel.x = 0.0;
        self.anim = PursuerAnim::Shock;
        self.animator.play(PursuerAnim::Shock.clip(), false);
    }
}

/// Jump decision for a grounded pursuer heading in `dir` (±1)
///
/// Pure: identical inputs always give the same answer.
pub fn should_jump(
    body: &DynamicBody,
    level: &Level,
    target: &DynamicBody,
    dir: f32,
    tuning: &Tuning,
) -> bool {
    let ground_y = tuning.world.ground_y;
    let params = &tuning.pursuit;
    let feet = body.feet();
    let on_ground = feet >= ground_y - 2.0;
    let target_above_ground = target.feet() < ground_y - 5.0;

    if on_ground {
        if let Some(ahead) = find_platform_ahead(body, level, dir, params.look_ahead, ground_y) {
            let blocks_path = ahead.pos.y < feet && ahead.pos.y + ahead.size.y > body.pos.y;
            if blocks_path || target_above_ground {
                return true;
            }
        }
    }

    let standing_on = body
        .grounded_platform
        .and_then(|handle| level.platform(handle))
        .filter(|plat| plat.pos.y < ground_y);
    if let Some(plat) = standing_on {
        let near_edge = if dir > 0.0 {
            body.pos.x + body.size.x >= plat.pos.x + plat.size.x - params.edge_margin
        } else {
            body.pos.x <= plat.pos.x + params.edge_margin
        };
        if near_edge && target_above_ground && has_reachable_platform(body, level, dir, tuning) {
            return true;
        }
    }

    false
}

/// Edge-to-edge distance from the body to a platform in direction `dir`
fn distance_ahead(body: &DynamicBody, plat: &Platform, dir: f32) -> f32 {
    if dir > 0.0 {
        plat.pos.x - (body.pos.x + body.size.x)
    } else {
        body.pos.x - (plat.pos.x + plat.size.x)
    }
}

/// Nearest floating platform ahead within `max_dist`; slight overlap still counts
fn find_platform_ahead<'a>(
    body: &DynamicBody,
    level: &'a Level,
    dir: f32,
    max_dist: f32,
    ground_y: f32,
) -> Option<&'a Platform> {
    level
        .floating(ground_y)
        .map(|(_, plat)| (plat, distance_ahead(body, plat, dir)))
        .filter(|&(_, dist)| dist > -10.0 && dist < max_dist)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(plat, _)| plat)
}

/// Another floating platform within jump distance and not too high above
fn has_reachable_platform(body: &DynamicBody, level: &Level, dir: f32, tuning: &Tuning) -> bool {
    let params = &tuning.pursuit;
    let current = body.grounded_platform.map(|handle| handle.index);
    level
        .floating(tuning.world.ground_y)
        .filter(|(index, _)| Some(*index) != current)
        .any(|(_, plat)| {
            let dist = distance_ahead(body, plat, dir);
            dist > 0.0 && dist < params.max_jump_dist && plat.pos.y >= body.pos.y - params.max_jump_height
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn level_with(floating: &[(f32, f32, f32)]) -> Level {
        let tuning = Tuning::default();
        let mut platforms = vec![Platform::new(
            Vec2::new(0.0, tuning.world.ground_y),
            Vec2::new(tuning.world.width, tuning.world.ground_height),
            false,
        )];
        for &(x, y, w) in floating {
            platforms.push(Platform::new(Vec2::new(x, y), Vec2::new(w, 20.0), true));
        }
        Level::from_platforms(1, platforms)
    }

    fn on_ground(x: f32) -> DynamicBody {
        let mut body = DynamicBody::new(Vec2::new(x, 490.0), Vec2::new(30.0, 50.0));
        body.grounded = true;
        body
    }

    #[test]
    fn test_no_jump_without_platforms_ahead() {
        let tuning = Tuning::default();
        let level = level_with(&[]);
        let pursuer = on_ground(500.0);
        let target = on_ground(600.0);
        assert!(!should_jump(&pursuer, &level, &target, 1.0, &tuning));
    }

    #[test]
    fn test_jumps_over_blocking_platform() {
        let tuning = Tuning::default();
        let level = level_with(&[(560.0, 500.0, 100.0)]);
        let pursuer = on_ground(500.0);
        let target = on_ground(900.0);
        assert!(should_jump(&pursuer, &level, &target, 1.0, &tuning));
        // Same platform behind the pursuer is ignored
        assert!(!should_jump(&pursuer, &level, &target, -1.0, &tuning));
    }

    #[test]
    fn test_jumps_when_target_airborne_above_platform() {
        let tuning = Tuning::default();
        // High platform: doesn't block, but the target is up there
        let level = level_with(&[(600.0, 380.0, 100.0)]);
        let pursuer = on_ground(500.0);
        let mut target = on_ground(650.0);
        assert!(!should_jump(&pursuer, &level, &target, 1.0, &tuning));
        target.pos.y = 300.0;
        assert!(should_jump(&pursuer, &level, &target, 1.0, &tuning));
    }

    #[test]
    fn test_platform_beyond_lookahead_ignored() {
        let tuning = Tuning::default();
        let level = level_with(&[(800.0, 500.0, 100.0)]);
        let pursuer = on_ground(500.0);
        let target = on_ground(1000.0);
        assert!(!should_jump(&pursuer, &level, &target, 1.0, &tuning));
    }

    #[test]
    fn test_edge_jump_needs_reachable_platform() {
        let tuning = Tuning::default();
        let level = level_with(&[(400.0, 450.0, 100.0), (560.0, 420.0, 100.0)]);
        let mut pursuer = DynamicBody::new(Vec2::new(465.0, 400.0), Vec2::new(30.0, 50.0));
        pursuer.grounded = true;
        pursuer.grounded_platform = Some(level.handle(1));
        let mut target = on_ground(700.0);
        target.pos.y = 300.0;

        assert!(should_jump(&pursuer, &level, &target, 1.0, &tuning));

        // Target back on the ground: walk off instead
        let grounded_target = on_ground(700.0);
        assert!(!should_jump(&pursuer, &level, &grounded_target, 1.0, &tuning));

        // Nothing ahead within jump distance
        let lonely = level_with(&[(400.0, 450.0, 100.0)]);
        pursuer.grounded_platform = Some(lonely.handle(1));
        assert!(!should_jump(&pursuer, &lonely, &target, 1.0, &tuning));
    }

    #[test]
    fn test_activation_delay() {
        let tuning = Tuning::default();
        let level = level_with(&[]);
        let mut pursuer = Pursuer::new(Vec2::new(100.0, 490.0), &tuning);
        let target = on_ground(400.0);

        assert!(!pursuer.update(&level, &target, &tuning, 1.0));
        assert!(!pursuer.active);

        pursuer.activate();
        let mut appeared_at = None;
        for frame in 1..=200 {
            if pursuer.update(&level, &target, &tuning, 1.0) {
                appeared_at = Some(frame);
                break;
            }
        }
        assert_eq!(appeared_at, Some(tuning.pursuit.activation_delay as i32));
        assert!(pursuer.active);
    }

    #[test]
    fn test_chases_toward_target() {
        let tuning = Tuning::default();
        let level = level_with(&[]);
        let mut pursuer = Pursuer::new(Vec2::new(1000.0, 490.0), &tuning);
        pursuer.activated = true;
        pursuer.active = true;
        let target = on_ground(400.0);

        for _ in 0..10 {
            pursuer.update(&level, &target, &tuning, 1.0);
        }
        assert!(pursuer.body.pos.x < 1000.0);
        assert!(!pursuer.facing_right);
        assert!(pursuer.body.grounded);
        assert_eq!(pursuer.anim, PursuerAnim::Running);
    }

    #[test]
    fn test_shock_stuns_then_recovers() {
        let tuning = Tuning::default();
        let level = level_with(&[]);
        let mut pursuer = Pursuer::new(Vec2::new(1000.0, 490.0), &tuning);
        pursuer.activated = true;
        pursuer.active = true;
        let target = on_ground(400.0);

        pursuer.play_shock();
        assert!(!pursuer.can_catch());
        for _ in 0..(tuning.pursuit.shock_duration as usize - 1) {
            pursuer.update(&level, &target, &tuning, 1.0);
        }
        assert_eq!(pursuer.body.pos.x, 1000.0);
        assert_eq!(pursuer.anim, PursuerAnim::Shock);

        pursuer.update(&level, &target, &tuning, 1.0);
        assert!(pursuer.can_catch());
        assert!(pursuer.body.pos.x < 1000.0);
    }

    #[test]
    fn test_distance_between_centres() {
        let tuning = Tuning::default();
        let pursuer = Pursuer::new(Vec2::new(0.0, 0.0), &tuning);
        let mut target = DynamicBody::new(Vec2::new(30.0, 40.0), Vec2::new(30.0, 50.0));
        assert!((pursuer.distance_to(&target) - 50.0).abs() < 1e-5);
        target.size = Vec2::new(90.0, 50.0);
        assert!((pursuer.distance_to(&target) - 72.11103).abs() < 1e-3);
    }

    #[test]
    fn test_trail_strategy_replays_path() {
        let mut tuning = Tuning::default();
        tuning.pursuit.strategy = PursuitStrategy::Trail;
        tuning.pursuit.activation_delay = 0.0;
        let level = level_with(&[]);
        let mut pursuer = Pursuer::new(Vec2::new(100.0, 490.0), &tuning);
        pursuer.activate();

        let mut target = on_ground(100.0);
        target.vel.x = 4.0;
        for _ in 0..20 {
            target.pos.x += 4.0;
            pursuer.record_target(&target, true, 1.0);
        }
        pursuer.update(&level, &target, &tuning, 1.0);
        assert!(pursuer.active);
        assert!(pursuer.body.pos.x < target.pos.x);
        assert!(pursuer.body.pos.x >= 100.0);
    }

    proptest! {
        #[test]
        fn prop_should_jump_is_deterministic(
            px in 0f32..3000.0, py in 100f32..490.0,
            tx in 0f32..3000.0, ty in 100f32..490.0,
            platforms in proptest::collection::vec((400f32..3800.0, 100f32..520.0, 80f32..200.0), 0..10),
            grounded_on in proptest::option::of(0usize..10),
            dir in prop_oneof![Just(1.0f32), Just(-1.0f32)],
        ) {
            let tuning = Tuning::default();
            let level = level_with(&platforms);
            let mut body = DynamicBody::new(Vec2::new(px, py), Vec2::new(30.0, 50.0));
            body.grounded = true;
            body.grounded_platform = grounded_on.map(|i| level.handle(i));
            let target = DynamicBody::new(Vec2::new(tx, ty), Vec2::new(30.0, 50.0));

            let first = should_jump(&body, &level, &target, dir, &tuning);
            for _ in 0..3 {
                prop_assert_eq!(should_jump(&body, &level, &target, dir, &tuning), first);
            }
        }
    }
}
