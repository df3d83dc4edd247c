//! Breadcrumb trail recording and replay
//!
//! The trail-follower pursuer does not simulate physics. It replays the
//! player's recorded path, advancing through samples at the rate they were
//! recorded and skipping samples where the player stood still.

use glam::Vec2;

use super::physics::DynamicBody;

/// Coarse motion state of a recorded sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Grounded and not moving
    Idle,
    Running,
    Airborne,
}

impl Motion {
    pub fn of(body: &DynamicBody) -> Self {
        if !body.grounded {
            Motion::Airborne
        } else if body.vel.x != 0.0 {
            Motion::Running
        } else {
            Motion::Idle
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    pub pos: Vec2,
    pub motion: Motion,
    pub facing_right: bool,
}

/// Append-only record of the target's positions
#[derive(Debug, Clone)]
pub struct Trail {
    samples: Vec<TrailSample>,
    /// Reference frames between samples
    interval: f32,
    elapsed: f32,
}

impl Trail {
    pub fn new(interval: f32) -> Self {
        Self {
            samples: Vec::new(),
            interval,
            elapsed: 0.0,
        }
    }

    /// Accumulate `dt` and append one sample per elapsed interval
    pub fn record(&mut self, sample: TrailSample, dt: f32) {
        self.elapsed += dt;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.samples.push(sample);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrailSample> {
        self.samples.get(index)
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.elapsed = 0.0;
    }
}

/// Interpolated replay position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailPose {
    pub pos: Vec2,
    pub motion: Motion,
    pub facing_right: bool,
}

/// Replays a trail from its first sample onward
#[derive(Debug, Clone)]
pub struct TrailFollower {
    pub trail: Trail,
    cursor: f32,
}

impl TrailFollower {
    pub fn new(interval: f32) -> Self {
        Self {
            trail: Trail::new(interval),
            cursor: 0.0,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Advance the replay by `dt` reference frames
    ///
    /// The cursor never passes the newest sample. Idle samples are skipped
    /// outright, so a stationary target closes the gap instead of being waited on.
    pub fn advance(&mut self, dt: f32) -> Option<TrailPose> {
        let len = self.trail.len();
        if len == 0 {
            return None;
        }
        let last = len - 1;
        self.cursor = (self.cursor + dt / self.trail.interval()).min(last as f32);

        let mut index = self.cursor.floor() as usize;
        while index < last && self.trail.samples[index].motion == Motion::Idle {
            index += 1;
            self.cursor = index as f32;
        }

        let current = self.trail.samples[index];
        let next = self.trail.samples[(index + 1).min(last)];
        let t = self.cursor - index as f32;
        Some(TrailPose {
            pos: current.pos.lerp(next.pos, t),
            motion: current.motion,
            facing_right: current.facing_right,
        })
    }

    pub fn reset(&mut self) {
        self.trail.reset();
        self.cursor = 0.0;
    }
}
